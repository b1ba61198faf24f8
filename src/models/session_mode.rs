use serde::Serialize;

use super::enums::SessionMode;

/// Catalog entry served by `GET /api/session-modes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionModeInfo {
    pub id: SessionMode,
    pub name: &'static str,
    pub description: &'static str,
    /// Minutes.
    pub default_work_duration: u32,
    /// Minutes. Zero means the mode is open-ended and never takes a break.
    pub default_break_duration: u32,
    pub color: &'static str,
}

pub const SESSION_MODES: [SessionModeInfo; 4] = [
    SessionModeInfo {
        id: SessionMode::Study,
        name: "Study",
        description: "Classic pomodoro: focused study blocks with short breaks",
        default_work_duration: 25,
        default_break_duration: 5,
        color: "#4F46E5",
    },
    SessionModeInfo {
        id: SessionMode::Deepwork,
        name: "Deep Work",
        description: "Long uninterrupted blocks for demanding work",
        default_work_duration: 90,
        default_break_duration: 20,
        color: "#0EA5E9",
    },
    SessionModeInfo {
        id: SessionMode::Yoga,
        name: "Yoga",
        description: "Open-ended practice timer",
        default_work_duration: 45,
        default_break_duration: 0,
        color: "#10B981",
    },
    SessionModeInfo {
        id: SessionMode::Zen,
        name: "Zen",
        description: "Meditation with a gentle ambient soundscape",
        default_work_duration: 20,
        default_break_duration: 0,
        color: "#A855F7",
    },
];

pub fn mode_info(mode: SessionMode) -> &'static SessionModeInfo {
    match mode {
        SessionMode::Study => &SESSION_MODES[0],
        SessionMode::Deepwork => &SESSION_MODES[1],
        SessionMode::Yoga => &SESSION_MODES[2],
        SessionMode::Zen => &SESSION_MODES[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_matches_ids() {
        for mode in SessionMode::ALL {
            assert_eq!(mode_info(mode).id, mode);
        }
    }

    #[test]
    fn colors_are_six_digit_hex() {
        for info in &SESSION_MODES {
            let hex = info.color.strip_prefix('#').unwrap();
            assert_eq!(hex.len(), 6);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
