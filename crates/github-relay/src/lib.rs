//! # github-relay
//!
//! GitHub webhook receiver that relays notifications to IRC (through an
//! [irker](http://www.catb.org/esr/irker/) daemon) and to Discord webhooks.
//!
//! ## How it works
//!
//! 1. GitHub sends `POST /webhook` with `X-Hub-Signature-256`, `X-GitHub-Event`,
//!    and `X-GitHub-Delivery` headers plus a JSON or form-encoded payload.
//! 2. The server validates the HMAC-SHA256 signature against `GITHUB_WEBHOOK_SECRET`.
//! 3. The repository full name (`owner/repo`) is matched against the `[irc]` and
//!    `[discord]` route tables of the config file; `*` matches anything.
//! 4. The event is rendered once per matched family and delivered:
//!    one irker JSON line per target and message line, one webhook `POST` per
//!    Discord URL.
//!
//! ## Responses
//!
//! | Status | When |
//! |---|---|
//! | `202` | Delivered |
//! | `200` | Event ignored by design, or no route matches the repository |
//! | `400` | Malformed request or payload |
//! | `401` | Missing or wrong signature |
//! | `501` | Event type or action has no notification format |
//! | `502` | irker or Discord delivery failed |
//!
//! ## Configuration
//!
//! Routes and defaults come from a TOML file (`--config`, env
//! `GITHUB_RELAY_CONFIG`, default `config/github-relay.toml`); these env vars
//! override it:
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `GITHUB_WEBHOOK_SECRET` | unset | HMAC-SHA256 secret (omit to skip validation) |
//! | `GITHUB_WEBHOOK_PORT` | `8080` | HTTP listening port |
//! | `IRKER_ADDR` | `127.0.0.1:6659` | irker daemon address |

pub mod config;
pub mod deliver;
pub mod env;
pub mod ingest;
pub mod mocks;
pub mod routing;
pub mod server;
pub mod signature;

pub use config::{ConfigError, RelayConfig};
pub use deliver::{Deliver, DeliveryError, Relay};
pub use server::{AppState, router, serve};
