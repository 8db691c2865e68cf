#![forbid(unsafe_code)]

pub mod account_service;
pub mod connection;
pub mod error;
pub mod session_loop;
pub mod session_view;

pub use quiz_core::Clock;

pub use account_service::{AccountConfig, AccountService, ApiResponse};
pub use connection::{
    ChannelProbe, ConnectionConfig, InMemoryChannel, InboundEvent, SessionChannel,
    SessionConnection,
};
pub use error::{AccountError, ConnectionError};
pub use session_loop::{LoopExit, SessionHandle, SessionLoop, UserCommand};
pub use session_view::{PresentationCue, ReportView, SessionView, StageView};
