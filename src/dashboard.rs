use chrono::{Local, Timelike};

/// Time-of-day greeting addressed to the stored gender.
pub fn greeting(hour: u32, gender: Option<&str>) -> String {
    let salutation = if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    };

    let addressee = match gender.map(str::trim).filter(|g| !g.is_empty()) {
        Some("Male") => "bro".to_string(),
        Some(other) => other.to_lowercase(),
        None => "friend".to_string(),
    };

    format!("{}, {}", salutation, addressee)
}

pub fn greeting_now(gender: Option<&str>) -> String {
    greeting(Local::now().hour(), gender)
}
