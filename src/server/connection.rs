// Connection handling module
// Serves a single TCP connection with the LDP request handler

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};

use super::activity::{Activity, ActivityStream};
use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the connection cap, and serve it in a task.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Longest pause between idle checks
const IDLE_CHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Handle a single connection in a spawned task.
///
/// Request headers must arrive within `read_timeout`. Otherwise the
/// connection lives as long as bytes keep moving; once it has been silent for
/// the idle limit it is asked to shut down, and dropped if it is still silent
/// after another idle limit. The counter is decremented either way.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let activity = Arc::new(Activity::new());
        let io = TokioIo::new(ActivityStream::new(stream, Arc::clone(&activity)));

        let performance = &state.config.performance;
        let idle_limit = idle_limit(performance);

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(Duration::from_secs(performance.read_timeout.max(1)))
            .keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );
        tokio::pin!(conn);

        let mut shutdown_deadline: Option<Instant> = None;
        loop {
            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(err) = result {
                        logger::log_connection_error(&err);
                    }
                    break;
                }
                () = tokio::time::sleep(IDLE_CHECK_INTERVAL.min(idle_limit)) => {
                    if activity.idle_for() < idle_limit {
                        continue;
                    }
                    match shutdown_deadline {
                        None => {
                            conn.as_mut().graceful_shutdown();
                            shutdown_deadline = Some(Instant::now() + idle_limit);
                        }
                        Some(deadline) if Instant::now() >= deadline => {
                            logger::log_warning(&format!(
                                "Connection from {peer_addr} idle for {} seconds, closing",
                                activity.idle_for().as_secs()
                            ));
                            break;
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Silence tolerated on a connection: the keep-alive window between requests,
/// or the write timeout while a response is stuck
fn idle_limit(performance: &PerformanceConfig) -> Duration {
    Duration::from_secs(
        performance
            .keep_alive_timeout
            .max(performance.write_timeout)
            .max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn performance(keep_alive_timeout: u64, write_timeout: u64) -> PerformanceConfig {
        PerformanceConfig {
            keep_alive_timeout,
            read_timeout: 30,
            write_timeout,
            max_connections: None,
            shutdown_timeout: 10,
        }
    }

    #[test]
    fn test_idle_limit() {
        assert_eq!(idle_limit(&performance(75, 30)), Duration::from_secs(75));
        assert_eq!(idle_limit(&performance(0, 30)), Duration::from_secs(30));
        assert_eq!(idle_limit(&performance(0, 0)), Duration::from_secs(1));
    }
}
