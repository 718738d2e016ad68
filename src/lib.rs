//! Typed async client for the Checkmarx One platform: OIDC token acquisition, an authenticated
//! request pipeline over the product and identity APIs, and tolerant decoding of the loosely
//! typed JSON those APIs return.
//!
//! ```no_run
//! # async fn demo() -> cx1_client::error::Result<()> {
//! use cx1_client::{
//! 	api::Cx1Client,
//! 	auth::Grant,
//! 	config::ClientConfig,
//! 	http::ReqwestHttpClient,
//! };
//!
//! let config = ClientConfig::from_env()?;
//! let client = <Cx1Client<ReqwestHttpClient>>::connect(config, &Grant::api_key("api-key")).await?;
//! let project = client.get_project_by_name("payments").await?;
//!
//! println!("{} has {} tags.", project.name, project.tags.len());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;

mod decode;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
