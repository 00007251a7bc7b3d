//! Image uploads with like/dislike voting, newest-first listings and a
//! score-ranked top list, served over HTTP.

pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod ranking;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod startup;
pub mod storage;
pub mod votes;

use std::path::PathBuf;

use crate::models::ContactInfo;
use crate::service::ImageService;

/// AppState holds shared resources for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: ImageService,
    pub uploads_dir: PathBuf,
    pub contacts: ContactInfo,
}
