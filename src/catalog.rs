//! Static DJ, event, and website data
//!
//! Declared in display order; every roster message iterates these slices
//! front to back.

/// Name the bot introduces itself with
pub const BOT_NAME: &str = "David";

/// A resident DJ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dj {
    pub name: &'static str,
    pub style: &'static str,
    pub specialty: &'static str,
    pub events: &'static [&'static str],
}

/// A recurring event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Venue {
    pub name: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub description: &'static str,
}

/// Website and social media details for the closing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebsiteInfo {
    pub url: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    /// (platform, handle) pairs
    pub social_media: &'static [(&'static str, &'static str)],
}

pub const DJS: &[Dj] = &[
    Dj {
        name: "DJ MICKY",
        style: "House and Deep Tech",
        specialty: "Groovy basslines and infectious rhythms",
        events: &["Club Night", "Beach Party"],
    },
    Dj {
        name: "DJ IPRO",
        style: "Techno and Progressive",
        specialty: "Mind-bending drops and epic buildups",
        events: &["Warehouse Rave", "Club Night"],
    },
    Dj {
        name: "DJ FUSION",
        style: "Tropical House and Chill",
        specialty: "Smooth transitions and summer vibes",
        events: &["Beach Party", "Sunday Brunch"],
    },
];

pub const EVENTS: &[Venue] = &[
    Venue {
        name: "Club Night",
        date: "Every Friday",
        time: "10 PM - 3 AM",
        location: "The Underground Club",
        description: "Deep house and techno night featuring DJ MICKY and DJ IPRO",
    },
    Venue {
        name: "Beach Party",
        date: "Every Saturday",
        time: "4 PM - 10 PM",
        location: "Sunset Beach",
        description: "Sunset sessions with DJ FUSION and DJ MICKY",
    },
    Venue {
        name: "Warehouse Rave",
        date: "Last Saturday of month",
        time: "11 PM - 6 AM",
        location: "The Factory",
        description: "Hard techno and industrial beats with DJ IPRO",
    },
    Venue {
        name: "Sunday Brunch",
        date: "Every Sunday",
        time: "12 PM - 5 PM",
        location: "Sky Lounge",
        description: "Relaxed vibes with DJ FUSION",
    },
];

pub const WEBSITE: WebsiteInfo = WebsiteInfo {
    url: "www.davidchatbot.com",
    description: "Your one-stop destination for the best electronic music events!",
    features: &[
        "Event Calendar & Tickets",
        "DJ Profiles & Music",
        "Photo Gallery",
        "VIP Reservations",
    ],
    social_media: &[
        ("Instagram", "@davidchatbot"),
        ("Facebook", "DavidChatbotOfficial"),
        ("Twitter", "@davidchatbot"),
    ],
};

/// Look up a DJ by name, ignoring case and surrounding whitespace
pub fn find_dj(name: &str) -> Option<&'static Dj> {
    let wanted = name.trim();
    DJS.iter().find(|dj| dj.name.eq_ignore_ascii_case(wanted))
}

/// "DJ MICKY, DJ IPRO, or DJ FUSION"
pub fn dj_choices() -> String {
    match DJS {
        [] => String::new(),
        [only] => only.name.to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|dj| dj.name).collect();
            format!("{}, or {}", head.join(", "), last.name)
        }
    }
}

/// Multi-line introduction of every resident DJ
pub fn dj_roster() -> String {
    let mut out = String::from("\nLet me introduce you to our amazing resident DJs:\n\n");
    for dj in DJS {
        out.push_str(&format!(" {}\n", dj.name));
        out.push_str(&format!("   • Style: {}\n", dj.style));
        out.push_str(&format!("   • Known for: {}\n", dj.specialty));
        out.push_str(&format!("   • Plays at: {}\n\n", dj.events.join(", ")));
    }
    out
}

/// Multi-line listing of every regular event
pub fn event_roster() -> String {
    let mut out = String::from("\nHere are our regular events:\n\n");
    for event in EVENTS {
        out.push_str(&format!(" {}\n", event.name));
        out.push_str(&format!("   • When: {}, {}\n", event.date, event.time));
        out.push_str(&format!("   • Where: {}\n", event.location));
        out.push_str(&format!("   • What: {}\n\n", event.description));
    }
    out
}

impl WebsiteInfo {
    /// Closing message pointing the user at the website and socials
    pub fn closing_message(&self) -> String {
        let features: Vec<String> = self.features.iter().map(|f| format!("• {f}")).collect();
        let socials: Vec<String> = self
            .social_media
            .iter()
            .map(|(platform, handle)| format!("• {platform}: {handle}"))
            .collect();
        format!(
            "\nBefore you go, check out our website at {}!\n\n{}\n\nFeatures:\n{}\n\nFollow us on social media:\n{}\n\nHave a great day! Hope to see you at our next event! 🎉",
            self.url,
            self.description,
            features.join("\n"),
            socials.join("\n"),
        )
    }
}
