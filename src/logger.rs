use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

use crate::config::Config;

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Secret server started successfully");
    println!("Listening on: http://{addr}");
    println!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("Using Tokio runtime for concurrency");
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[{}] [Connection] Accepted from: {}", timestamp(), peer_addr);
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[{}] [Error] Failed to serve connection: {:?}", timestamp(), err);
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("[{}] [Request] {} {} {:?}", timestamp(), method, uri, version);
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[{}] [Headers] Count: {}", timestamp(), count);
    }
}

pub fn log_response(status: u16, size: u64) {
    println!("[{}] [Response] {} ({} bytes)\n", timestamp(), status, size);
}

pub fn log_auth_failure(path: &str, reason: &str) {
    println!("[{}] [Auth] Rejected {} - {}", timestamp(), path, reason);
}

pub fn log_warning(msg: &str) {
    eprintln!("[{}] [Warn] {}", timestamp(), msg);
}

pub fn log_error(msg: &str) {
    eprintln!("[{}] [Error] {}", timestamp(), msg);
}
