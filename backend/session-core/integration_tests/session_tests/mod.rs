mod bootstrap;
mod client;
mod lifecycle;
