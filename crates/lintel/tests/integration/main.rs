mod helpers;

mod check;
mod config;
mod fix;
mod output_format;
mod suppression;
