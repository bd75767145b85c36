pub mod http_server;
pub mod log_capture;
