//! streamparams — streaming request parameters with cooperative cancellation.
//!
//! Builds the parameter bundle for one outbound streaming call to a language
//! model provider: normalizes user-edited timeout and tool-step settings,
//! merges caller cancellation with an idle-timeout signal, and bounds the
//! tool-calling loop with a step-count stop condition.
//!
//! # Quick Start
//!
//! ```no_run
//! use streamparams::prelude::*;
//!
//! # async fn example() -> streamparams::error::Result<()> {
//! let user_stop = AbortController::new();
//! let provider = ProviderSettings::builder()
//!     .id("openai")
//!     .provider_type("openai")
//!     .max_tool_steps(42)
//!     .sse_idle_timeout_minutes(5)
//!     .build();
//! let assistant = Assistant::builder().id("default").name("Default").build();
//!
//! let BuiltStreamParams { params, streaming_config } = StreamParamsBuilder::default()
//!     .build(
//!         vec![ModelMessage::user("Hello!")],
//!         &assistant,
//!         &provider,
//!         StreamParamsOptions::default().with_signal(user_stop.signal()),
//!     )
//!     .await?;
//!
//! // hand `params` to the transport; dispose the idle timer when done
//! streaming_config.dispose();
//! # let _ = params;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod idle;
pub mod params;
pub mod prelude;
pub mod signal;
pub mod stop;
pub mod types;
pub mod util;
