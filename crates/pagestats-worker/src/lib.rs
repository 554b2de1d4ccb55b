#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod event;
pub mod handler;
pub mod resolver;
pub mod service;

pub use error::{Result, WorkerError};
pub use event::TriggerEvent;
pub use handler::{HandlerResponse, ResponseBody, StatsHandler};
pub use resolver::resolve_stats_key;
pub use service::{WorkerConfig, WorkerState};
