use serde::{Deserialize, Serialize};

/// Port used by the development server, which always shows save buttons.
const DEV_SERVER_PORT: &str = "3000";

/// The parts of the hosting page's address that select the editor mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    /// Scheme including the trailing colon, e.g. `http:`.
    pub protocol: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
}

/// How the editor is embedded, computed once at bootstrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Opened as an admin tab: only the event list is shown, without save
    /// buttons.
    pub is_tab_mode: bool,
    /// Served by the web adapter rather than the admin.
    pub is_web_mode: bool,
    /// Resolved socket address of the transport, when one was configured.
    pub base_transport_url: Option<String>,
}

impl Environment {
    /// Derive the environment from the page address and the optional
    /// socket URL injected by the host page.
    pub fn detect(page: &PageLocation, socket_url: Option<&str>) -> Self {
        let shows_bottom_buttons = if !page.pathname.contains("adapter/")
            && page.port != DEV_SERVER_PORT
        {
            false
        } else {
            !(page.pathname.contains("/tab.html")
                || page.pathname.contains("/tab_m.html"))
        };

        let base_transport_url = socket_url.map(|url| {
            if url.starts_with(':') {
                format!("{}//{}{}", page.protocol, page.hostname, url)
            } else {
                url.to_string()
            }
        });

        let environment = Self {
            is_tab_mode: !shows_bottom_buttons,
            is_web_mode: socket_url.is_some(),
            base_transport_url,
        };
        log::debug!("detected environment {environment:?}");
        environment
    }

    /// Return whether save and close buttons are rendered.
    pub fn shows_bottom_buttons(&self) -> bool {
        !self.is_tab_mode
    }

    /// Relative prefix for event list images.
    pub fn image_prefix(&self) -> &'static str {
        if self.is_web_mode { "../" } else { "../.." }
    }
}
