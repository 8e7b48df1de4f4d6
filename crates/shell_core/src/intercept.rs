use crate::{classify, Effect, Notice, RoutingDecision, ShellFeatures};

/// One navigation report from the browser surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub url: String,
    /// `false` for the pre-navigation hook, `true` once the surface has started loading.
    pub is_completed_navigation: bool,
}

impl NavigationEvent {
    pub fn attempt(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_completed_navigation: false,
        }
    }

    pub fn state_change(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_completed_navigation: true,
        }
    }
}

/// Outcome of running the interceptor on a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interception {
    /// Whether the surface may keep loading the URL.
    pub allow: bool,
    pub decision: RoutingDecision,
    pub effects: Vec<Effect>,
}

/// Classifies `url`, then drops decisions for features this deployment has switched off.
pub fn route(url: &str, features: &ShellFeatures) -> RoutingDecision {
    match classify(url) {
        RoutingDecision::OpenExternally(_) if !features.external_links => RoutingDecision::Continue,
        RoutingDecision::Download(_) | RoutingDecision::Block(_) if !features.downloads => {
            RoutingDecision::Continue
        }
        decision => decision,
    }
}

pub fn intercept(event: &NavigationEvent, features: &ShellFeatures) -> Interception {
    let decision = route(&event.url, features);
    let action = match &decision {
        RoutingDecision::Continue => {
            return Interception {
                allow: true,
                decision,
                effects: Vec::new(),
            };
        }
        RoutingDecision::Download(url) => Effect::StartDownload { url: url.clone() },
        RoutingDecision::OpenExternally(url) => Effect::OpenExternally { url: url.clone() },
        RoutingDecision::Block(_) => Effect::Notify(Notice::unsupported_content()),
    };

    // Before navigation the veto is enough; afterwards the load is already running.
    let mut effects = Vec::with_capacity(2);
    if event.is_completed_navigation {
        effects.push(Effect::StopLoading);
    }
    effects.push(action);

    Interception {
        allow: false,
        decision,
        effects,
    }
}
