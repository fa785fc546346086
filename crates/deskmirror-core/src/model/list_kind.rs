//! The polled lists and their per-list settings keys.
//!
//! Each list differs only by which settings it reads, so the differences
//! live in one table instead of one type per list.

/// Which remote list a controller mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListKind {
    Editing,
    Revision,
    Late,
}

/// Static settings for one [`ListKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub title: &'static str,
    /// Key holding the list identifier (for file exports: the export path).
    pub list_id_key: &'static str,
    /// Key holding the accent colour as `#rrggbb`.
    pub accent_color_key: &'static str,
    pub default_accent: [u8; 3],
}

const EDITING: ListSettings = ListSettings {
    title: "Editing",
    list_id_key: "board.editing_list",
    accent_color_key: "color.editing",
    default_accent: [0x3b, 0x82, 0xf6],
};

const REVISION: ListSettings = ListSettings {
    title: "Revision",
    list_id_key: "board.revision_list",
    accent_color_key: "color.revision",
    default_accent: [0xf9, 0x73, 0x16],
};

const LATE: ListSettings = ListSettings {
    title: "Late",
    list_id_key: "board.late_list",
    accent_color_key: "color.late",
    default_accent: [0xf3, 0x8b, 0xa8],
};

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Editing, ListKind::Revision, ListKind::Late];

    pub fn settings(self) -> &'static ListSettings {
        match self {
            Self::Editing => &EDITING,
            Self::Revision => &REVISION,
            Self::Late => &LATE,
        }
    }

    pub fn title(self) -> &'static str {
        self.settings().title
    }
}

/// Parse `#rrggbb` (leading `#` optional) into RGB.
pub fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_distinct_keys() {
        let mut keys: Vec<&str> = ListKind::ALL
            .iter()
            .flat_map(|k| [k.settings().list_id_key, k.settings().accent_color_key])
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ListKind::ALL.len() * 2);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#3b82f6"), Some([0x3b, 0x82, 0xf6]));
        assert_eq!(parse_hex_color("F97316"), Some([0xf9, 0x73, 0x16]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }
}
