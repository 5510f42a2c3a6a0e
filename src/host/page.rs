use crate::{
    error::{MirrorError, Result},
    host::{
        HostDocument,
        config::{ConnectionOptions, LaunchOptions},
    },
    traversal::{NodeKind, SourceNode},
};
use async_trait::async_trait;
use headless_chrome::{Browser, Tab, protocol::cdp::DOM};
use std::{borrow::Cow, ffi::OsStr, sync::Arc, time::Duration};

/// DOM node as reported by the DevTools protocol
pub type DomNode = DOM::Node;

impl SourceNode for DomNode {
    /// Backend node id, stable for the lifetime of the page
    fn id(&self) -> Cow<'_, str> {
        Cow::Owned(self.backend_node_id.to_string())
    }

    fn name(&self) -> Cow<'_, str> {
        if self.local_name.is_empty() {
            Cow::Borrowed(&self.node_name)
        } else {
            Cow::Borrowed(&self.local_name)
        }
    }

    fn node_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.node_name)
    }

    fn kind(&self) -> Result<NodeKind<'_, Self>> {
        match (&self.children, self.child_node_count) {
            (Some(children), _) => Ok(NodeKind::Container(children)),
            (None, Some(count)) if count > 0 => Err(MirrorError::MalformedNode {
                id: self.backend_node_id.to_string(),
                reason: format!("{} reports {} children that were not loaded", self.node_name, count),
            }),
            (None, _) => Ok(NodeKind::Leaf),
        }
    }
}

/// What [`PageDocument::close`] may close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    /// The browser was launched by this process
    Browser,
    /// Attached to a running browser, the tab was opened by this process
    Tab,
    /// Attached to a running browser and reusing one of its tabs
    Borrowed,
}

impl Ownership {
    fn attached(created_tab: bool) -> Self {
        if created_tab { Ownership::Tab } else { Ownership::Borrowed }
    }

    fn closes_all_tabs(self) -> bool {
        self == Ownership::Browser
    }

    fn closes_own_tab(self) -> bool {
        self != Ownership::Borrowed
    }
}

/// Web page whose DOM is the source tree
pub struct PageDocument {
    browser: Browser,
    tab: Arc<Tab>,
    ownership: Ownership,
    url: Option<String>,
    document: Option<DomNode>,
}

impl PageDocument {
    /// Launch a new browser and open a blank tab
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // The default 30 second idle timeout can close the browser during slow loads
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 10);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path;
        launch_opts.user_data_dir = options.user_data_dir;
        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| MirrorError::LaunchFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| MirrorError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            ownership: Ownership::Browser,
            url: None,
            document: None,
        })
    }

    /// Attach to a running browser, reusing its first tab when there is one
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url).map_err(|e| MirrorError::ConnectionFailed(e.to_string()))?;

        let existing = browser
            .get_tabs()
            .lock()
            .map_err(|e| MirrorError::ConnectionFailed(format!("Failed to get tabs: {}", e)))?
            .first()
            .cloned();
        let created_tab = existing.is_none();
        let tab = match existing {
            Some(tab) => tab,
            None => browser
                .new_tab()
                .map_err(|e| MirrorError::ConnectionFailed(format!("Failed to create tab: {}", e)))?,
        };

        Ok(Self {
            browser,
            tab,
            ownership: Ownership::attached(created_tab),
            url: None,
            document: None,
        })
    }

    /// Builder method: navigate to `url` during the readiness wait
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Close what this process opened
    ///
    /// A launched browser has all of its tabs closed. On an attached browser
    /// only a tab opened by [`PageDocument::connect`] is closed; the user's
    /// own tabs are left alone.
    pub fn close(&self) -> Result<()> {
        if !self.ownership.closes_all_tabs() {
            if self.ownership.closes_own_tab() {
                self.tab
                    .close(false)
                    .map_err(|e| MirrorError::ConnectionFailed(format!("Failed to close tab: {}", e)))?;
            } else {
                log::debug!("Leaving the attached browser's tab open");
            }
            return Ok(());
        }

        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| MirrorError::ConnectionFailed(format!("Failed to get tabs: {}", e)))?
            .clone();
        for tab in tabs {
            if let Err(e) = tab.close(false) {
                log::debug!("Failed to close tab: {}", e);
            }
        }
        Ok(())
    }
}

/// Navigate, wait for the load and fetch the whole DOM in one call
fn fetch_document(tab: &Tab, url: Option<&str>) -> Result<DomNode> {
    if let Some(url) = url {
        tab.navigate_to(url)
            .map_err(|e| MirrorError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
    }

    tab.wait_until_navigated()
        .map_err(|e| MirrorError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

    let document = tab
        .call_method(DOM::GetDocument {
            // CDP takes -1 for the entire subtree; the protocol type is unsigned here
            depth: Some(u32::MAX),
            pierce: Some(false),
        })
        .map_err(|e| MirrorError::DocumentLoadFailed(format!("Failed to fetch DOM: {}", e)))?;

    Ok(document.root)
}

#[async_trait]
impl HostDocument for PageDocument {
    type Node = DomNode;

    async fn load_all(&mut self) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let url = self.url.clone();

        let root = tokio::task::spawn_blocking(move || fetch_document(&tab, url.as_deref()))
            .await
            .map_err(|e| MirrorError::DocumentLoadFailed(format!("DOM loader task failed: {}", e)))??;

        log::debug!("Loaded page DOM (root {})", root.backend_node_id);
        self.document = Some(root);
        Ok(())
    }

    fn root(&self) -> Result<&DomNode> {
        self.document.as_ref().ok_or(MirrorError::DocumentNotReady)
    }

    fn describe(&self) -> String {
        match &self.url {
            Some(url) => format!("page {}", url),
            None => "current page".to_string(),
        }
    }
}
