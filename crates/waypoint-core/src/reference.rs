//! Built-in Termux quick reference.
//!
//! A static catalogue of short tips grouped into named sections. The
//! CLI renders the whole catalogue or a single section, as text or as
//! JSON.

use serde::Serialize;

/// One reference tip: a short topic and its explanation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceEntry {
    pub topic: &'static str,
    pub detail: &'static str,
}

/// A named group of reference entries.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceSection {
    /// Stable identifier used for lookups, matched case-insensitively
    pub name: &'static str,
    /// Human-readable heading
    pub title: &'static str,
    pub entries: &'static [ReferenceEntry],
}

/// All built-in reference sections, in display order.
pub static REFERENCE: &[ReferenceSection] = &[
    ReferenceSection {
        name: "keyboard",
        title: "Keyboard shortcuts",
        entries: &[
            ReferenceEntry {
                topic: "Volume Down + C",
                detail: "Sends Ctrl+C to interrupt the running process.",
            },
            ReferenceEntry {
                topic: "Volume Down + D",
                detail: "Sends Ctrl+D (end of input, closes the shell).",
            },
            ReferenceEntry {
                topic: "Volume Up + T",
                detail: "Sends the Tab key for shell completion.",
            },
            ReferenceEntry {
                topic: "Volume Up + Q",
                detail: "Toggles the extra-keys row above the keyboard.",
            },
        ],
    },
    ReferenceSection {
        name: "extra-keys",
        title: "Extra keys row",
        entries: &[
            ReferenceEntry {
                topic: "Customization",
                detail: "Edit ~/.termux/termux.properties and set the extra-keys \
                         property, then run termux-reload-settings.",
            },
            ReferenceEntry {
                topic: "Common layout",
                detail: "extra-keys = [['ESC','/','-','HOME','UP','END'],\
                         ['TAB','CTRL','ALT','LEFT','DOWN','RIGHT']]",
            },
        ],
    },
    ReferenceSection {
        name: "package-management",
        title: "Package management",
        entries: &[
            ReferenceEntry {
                topic: "pkg update -y",
                detail: "Refreshes package lists and upgrades installed packages.",
            },
            ReferenceEntry {
                topic: "pkg install <name>",
                detail: "Installs a package. Termux has no sudo; never prefix commands \
                         with it.",
            },
            ReferenceEntry {
                topic: "pkg search <term>",
                detail: "Searches the repositories for matching packages.",
            },
            ReferenceEntry {
                topic: "termux-change-repo",
                detail: "Switches to a faster package mirror when downloads stall.",
            },
        ],
    },
    ReferenceSection {
        name: "termux-api",
        title: "Termux:API",
        entries: &[
            ReferenceEntry {
                topic: "Setup",
                detail: "Install the Termux:API app, then `pkg install termux-api` \
                         for the command-line bridge.",
            },
            ReferenceEntry {
                topic: "termux-battery-status",
                detail: "Prints battery level and charging state as JSON.",
            },
            ReferenceEntry {
                topic: "termux-clipboard-get / -set",
                detail: "Reads or writes the system clipboard from the shell.",
            },
            ReferenceEntry {
                topic: "termux-notification",
                detail: "Posts an Android notification, useful at the end of long jobs.",
            },
        ],
    },
    ReferenceSection {
        name: "appearance",
        title: "Appearance",
        entries: &[
            ReferenceEntry {
                topic: "Color scheme",
                detail: "Place a colors.properties file in ~/.termux/ and run \
                         termux-reload-settings.",
            },
            ReferenceEntry {
                topic: "Font",
                detail: "Drop a font.ttf into ~/.termux/ to replace the terminal font.",
            },
        ],
    },
];

/// Finds a section by name, ignoring case.
pub fn lookup_section(name: &str) -> Option<&'static ReferenceSection> {
    REFERENCE
        .iter()
        .find(|section| section.name.eq_ignore_ascii_case(name.trim()))
}
