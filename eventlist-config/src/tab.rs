use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level views of the settings editor.
///
/// Every tab is reachable from every other one; the editor starts on
/// [`SelectedTab::Options`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectedTab {
    #[default]
    Options,
    List,
    Pdf,
}

impl SelectedTab {
    /// Tabs in display order.
    pub const ALL: [SelectedTab; 3] =
        [SelectedTab::Options, SelectedTab::List, SelectedTab::Pdf];

    /// Identifier used in the navigation hash.
    pub fn id(self) -> &'static str {
        match self {
            SelectedTab::Options => "options",
            SelectedTab::List => "list",
            SelectedTab::Pdf => "pdf",
        }
    }

    /// Label shown on the tab header.
    pub fn title(self) -> &'static str {
        match self {
            SelectedTab::Options => "Options",
            SelectedTab::List => "Event list",
            SelectedTab::Pdf => "PDF",
        }
    }

    /// Position of the tab in the tab bar.
    pub fn index(self) -> usize {
        match self {
            SelectedTab::Options => 0,
            SelectedTab::List => 1,
            SelectedTab::Pdf => 2,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.id() == id)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolve the externally visible tab identifier.
    ///
    /// A missing or empty identifier means the default tab; an unknown one
    /// resolves to no tab at all.
    pub fn resolve(tab_id: Option<&str>) -> Option<Self> {
        match tab_id {
            None | Some("") => Some(Self::default()),
            Some(id) => Self::from_id(id),
        }
    }
}

impl fmt::Display for SelectedTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Display index for a tab identifier, `None` when no tab is selected.
pub fn index_of(tab_id: Option<&str>) -> Option<usize> {
    SelectedTab::resolve(tab_id).map(SelectedTab::index)
}

/// Navigation collaborator owning the externally visible tab identifier.
pub trait Navigator {
    /// Return the current tab identifier, if any.
    fn current_tab(&self) -> Option<&str>;

    /// Switch to `tab_id`. Unknown identifiers are accepted verbatim.
    fn navigate(&mut self, tab_id: &str);
}

/// Parsed `#tab/dialog/id/arg` navigation hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteLocation {
    pub tab: String,
    pub dialog: String,
    pub id: String,
    pub arg: String,
}

impl RouteLocation {
    /// Parse a location hash. The leading `#` is optional and missing
    /// segments are empty.
    pub fn parse(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let mut parts = hash.splitn(4, '/').map(String::from);

        Self {
            tab: parts.next().unwrap_or_default(),
            dialog: parts.next().unwrap_or_default(),
            id: parts.next().unwrap_or_default(),
            arg: parts.next().unwrap_or_default(),
        }
    }

    /// Format the location back into a hash, dropping empty trailing
    /// segments.
    pub fn to_hash(&self) -> String {
        let segments = [&self.tab, &self.dialog, &self.id, &self.arg];
        let used = segments
            .iter()
            .rposition(|segment| !segment.is_empty())
            .map_or(0, |last| last + 1);

        let mut hash = String::from("#");
        for (index, segment) in segments[..used].iter().enumerate() {
            if index > 0 {
                hash.push('/');
            }
            hash.push_str(segment);
        }
        hash
    }
}

/// In-memory navigator backed by a location hash.
#[derive(Debug, Clone, Default)]
pub struct HashNavigator {
    location: RouteLocation,
}

impl HashNavigator {
    /// Start from an existing location hash.
    pub fn from_hash(hash: &str) -> Self {
        Self {
            location: RouteLocation::parse(hash),
        }
    }

    pub fn location(&self) -> &RouteLocation {
        &self.location
    }
}

impl Navigator for HashNavigator {
    fn current_tab(&self) -> Option<&str> {
        Some(self.location.tab.as_str()).filter(|tab| !tab.is_empty())
    }

    fn navigate(&mut self, tab_id: &str) {
        log::debug!("navigating to tab {tab_id:?}");
        self.location = RouteLocation {
            tab: tab_id.to_string(),
            ..RouteLocation::default()
        };
    }
}
