mod config_validation;
mod token_server;
