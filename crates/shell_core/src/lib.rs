//! Web shell core: pure routing, bridge protocol and view-shell state machine.
mod bridge;
mod classify;
mod effect;
mod features;
mod intercept;
mod msg;
mod notice;
mod script;
mod state;
mod update;
mod view_model;

pub use bridge::{
    route_bridge_message, BridgeError, BridgeMessage, ExportKind, ExportRequest,
    BRIDGE_PROTOCOL_VERSION,
};
pub use classify::{
    classify, file_extension, is_image_filename, BlockReason, RoutingDecision,
    DOWNLOAD_EXTENSIONS, EXTERNAL_SCHEMES, IMAGE_EXTENSIONS,
};
pub use effect::Effect;
pub use features::ShellFeatures;
pub use intercept::{intercept, route, Interception, NavigationEvent};
pub use msg::Msg;
pub use notice::Notice;
pub use script::{injected_scripts, BLOB_LINK_SCRIPT, FILE_SAVER_SCRIPT};
pub use state::{ShellState, ViewPhase};
pub use update::update;
pub use view_model::ShellViewModel;
