use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use merit_algo::DispatchPlanner;
use merit_cli::server::{self, AppState};

pub fn handle(planner: DispatchPlanner, addr: SocketAddr) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::run(addr, Arc::new(AppState::new(planner))))
}
