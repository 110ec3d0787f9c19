//! Build script for hydrogreen-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates dashboard.toml and embeds it as a postcard blob

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use hydrogreen_core::config::{ConfigError, DashboardConfig, MAX_CONFIG_SIZE};

fn main() {
    setup_linker();
    embed_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate dashboard.toml and write the encoded config to OUT_DIR
fn embed_config() {
    println!("cargo:rerun-if-changed=dashboard.toml");

    let config_path = Path::new("dashboard.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: dashboard.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a dashboard.toml configuration file.      ║\n\
            ║  Please create one in the hydrogreen-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read dashboard.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: DashboardConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid dashboard.toml                                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in dashboard.toml                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(describe(e))
        );
    }

    let mut buf = [0u8; MAX_CONFIG_SIZE];
    let encoded = match config.to_postcard(&mut buf) {
        Ok(encoded) => encoded,
        Err(e) => panic!("failed to encode dashboard config: {}", describe(e)),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("dashboard_config.bin"), encoded).unwrap();

    println!("cargo:warning=dashboard.toml validated successfully");
}

/// Human-readable config error
fn describe(e: ConfigError) -> &'static str {
    match e {
        ConfigError::ZeroTickRate => "tick_hz must be greater than zero",
        ConfigError::ZeroRefreshInterval => "timing.refresh_ms must be greater than zero",
        ConfigError::ZeroLinkTimeout => "link.timeout_ms must be greater than zero",
        ConfigError::EmergencyWindow => {
            "timing.emergency_indicator_on_ms must be below emergency_cycle_ms"
        }
        ConfigError::LeakWindow => "timing.leak_alarm_on_ms must be below leak_cycle_ms",
        ConfigError::ZeroSpeedScale => "speed_bar_full_scale must be greater than zero",
        ConfigError::Encoding => "config does not fit the embedded blob",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
