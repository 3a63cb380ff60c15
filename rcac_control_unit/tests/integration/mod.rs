mod config_load;
mod lifecycle;
mod scenario;
