//! Client library and demo frontend for the TextVAR text-to-image service.
//!
//! The [`VarClient`] talks to the remote VAR API (health checks, single and
//! batch generation) and the [`StudioPage`] controller drives one interactive
//! generation cycle. The optional `server` feature adds a small actix-web
//! demo frontend around the controller.
//!
//! ```no_run
//! use textvar::{GenerationOptions, VarApiConfig, VarClient};
//!
//! # async fn demo() -> textvar::Result<()> {
//! let client = VarClient::new(
//!     VarApiConfig::new().with_base_url("http://localhost:8000"),
//! )?;
//!
//! let health = client.check_health().await?;
//! assert!(health.is_ready());
//!
//! let image = client
//!     .image()
//!     .generate("a beautiful red rose flower", &GenerationOptions::default())
//!     .await?;
//! println!("{}", image.to_data_uri());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod studio;
pub mod var;

pub use config::{Config, Deadlines, VarApiConfig};
pub use error::{Result, VarError};
pub use models::*;
pub use studio::{PageState, StudioPage};
pub use var::{ImageClient, VarClient};
