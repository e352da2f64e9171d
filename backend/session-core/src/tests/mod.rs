mod config;
mod connection;
mod envelope;
mod transport;
