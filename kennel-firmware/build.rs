//! Build script for kennel-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` with the validated `BoardConfig`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use kennel_config::{format_error_lines, BoardFile, LoadError};

fn main() {
    setup_linker();
    let board = load_config();
    generate_config(&board);
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate board.toml
fn load_config() -> BoardFile {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the kennel-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax errors, missing sections and wrong value types land in Parse
    let board = match kennel_config::parse(&config_content) {
        Ok(board) => board,
        Err(LoadError::Parse(error_msg)) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
        Err(LoadError::Invalid(errors)) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board configuration                              ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                errors
                    .iter()
                    .map(|e| format!("║  • {:<62} ║", e))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }
    };

    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Write `board_config.rs` to OUT_DIR
fn generate_config(board: &BoardFile) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board_config.rs"), board.render()).unwrap();
}
