//! Texture Geometry Inspection Binary
//!
//! Prints the mip chain, strides and wgpu mapping of a texture descriptor
//!
//! Usage:
//!   cargo run --bin texture_info -- --width 1024 --height 512 --levels 4
//!   cargo run --bin texture_info -- --width 256 --height 256 --format dxt1
//!   cargo run --bin texture_info -- --width 64 --height 64 --layers 6 --cube

use std::env;
use std::process;

use emu_texture::backend;
use emu_texture::{
    identity_hash, TextureDescriptor, TextureFlags, TextureFormat, TextureKind,
};
use wgpu_types as wgt;

// ANSI colors for output
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_BOLD: &str = "\x1b[1m";

// ============================================================================
// Main Program
// ============================================================================

fn main() {
    emu_texture::init_logging();

    let desc = match parse_args(env::args().skip(1)) {
        Ok(desc) => desc,
        Err(message) => {
            eprintln!("{}Error:{} {}", ANSI_RED, ANSI_RESET, message);
            print_usage();
            process::exit(1);
        }
    };

    println!("{}Texture Descriptor{}", ANSI_BOLD, ANSI_RESET);
    println!("{}", "=".repeat(50));
    println!("{}", desc);
    println!("identity hash: {:016x}", identity_hash(&desc));

    if let Err(e) = desc.validate() {
        println!("{}X{} {}", ANSI_RED, ANSI_RESET, e);
        process::exit(1);
    }
    println!("{}+{} valid", ANSI_GREEN, ANSI_RESET);

    print_mip_chain(&desc);
    print_wgpu_mapping(&desc);
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<TextureDescriptor, String> {
    let mut desc = TextureDescriptor::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" | "-w" => desc.width = parse_number(&arg, args.next())?,
            "--height" | "-H" => desc.height = parse_number(&arg, args.next())?,
            "--levels" | "-l" => desc.levels = parse_number(&arg, args.next())?,
            "--layers" => desc.layers = parse_number(&arg, args.next())?,
            "--samples" | "-s" => desc.samples = parse_number(&arg, args.next())?,
            "--format" | "-f" => {
                let name = args.next().ok_or_else(|| format!("{} needs a value", arg))?;
                desc.format = name.parse::<TextureFormat>().map_err(|e| e.to_string())?;
            }
            "--cube" => {
                desc.flags |= TextureFlags::CUBE_MAP;
                desc.kind = TextureKind::CubeMap;
            }
            "--2d" => desc.kind = TextureKind::TwoD,
            "--render-target" => desc.flags |= TextureFlags::RENDER_TARGET,
            "--compute" => desc.flags |= TextureFlags::COMPUTE_IMAGE,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(desc)
}

fn parse_number(flag: &str, value: Option<String>) -> Result<u32, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

fn print_usage() {
    println!("Usage: texture_info [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --width, -w <n>         Width of mip level 0 (default: 1)");
    println!("  --height, -H <n>        Height of mip level 0 (default: 1)");
    println!("  --levels, -l <n>        Mip level count (default: 1)");
    println!("  --layers <n>            Array layer count (default: 1)");
    println!("  --samples, -s <n>       Sample count (default: 1)");
    println!("  --format, -f <name>     Format name, e.g. RGBA8, DXT1, D24_S8 (default: RGBA8)");
    println!("  --cube                  Cube map (sets flag and kind)");
    println!("  --2d                    Plain 2D texture instead of a 2D array");
    println!("  --render-target         Render target flag");
    println!("  --compute               Compute image flag");
    println!("  --help, -h              Show this help");
    println!();
    println!("Formats:");
    let names: Vec<_> = TextureFormat::ALL
        .iter()
        .filter(|f| f.layout().is_some())
        .map(|f| f.name())
        .collect();
    println!("  {}", names.join(", "));
}

// ============================================================================
// Report
// ============================================================================

fn print_mip_chain(desc: &TextureDescriptor) {
    println!();
    println!("{}Mip Chain{}", ANSI_BOLD, ANSI_RESET);
    println!("{}", "=".repeat(50));
    println!(
        "{:>5}  {:<22} {:>10} {:>6} {:>12}",
        "level", "rect", "stride", "rows", "bytes/layer"
    );

    for level in 0..desc.levels {
        let rect = desc.mip_rect(level);
        let bytes = if desc.is_multisampled() {
            "-".to_string()
        } else {
            desc.mip_byte_size(level).to_string()
        };
        println!(
            "{:>5}  {:<22} {:>10} {:>6} {:>12}",
            level,
            rect.to_string(),
            desc.mip_stride(level),
            desc.mip_row_count(level),
            bytes
        );
    }

    if !desc.is_multisampled() {
        println!("total: {} bytes", desc.total_byte_size());
    }
}

fn print_wgpu_mapping(desc: &TextureDescriptor) {
    println!();
    println!("{}wgpu Mapping{}", ANSI_BOLD, ANSI_RESET);
    println!("{}", "=".repeat(50));

    match backend::texture_descriptor(desc, Some("texture_info")) {
        Ok(wgpu_desc) => {
            println!("{}format:{} {:?}", ANSI_CYAN, ANSI_RESET, wgpu_desc.format);
            println!("{}usage:{} {:?}", ANSI_CYAN, ANSI_RESET, wgpu_desc.usage);
            println!(
                "{}view:{} {:?}",
                ANSI_CYAN,
                ANSI_RESET,
                backend::view_dimension(desc)
            );
            let features = desc.format.required_features();
            if !features.is_empty() {
                println!("{}features:{} {:?}", ANSI_CYAN, ANSI_RESET, features);
            }
            let layout = backend::copy_layout(desc, 0, wgt::COPY_BYTES_PER_ROW_ALIGNMENT);
            println!(
                "{}copy layout:{} bytes_per_row={:?} rows_per_image={:?}",
                ANSI_CYAN, ANSI_RESET, layout.bytes_per_row, layout.rows_per_image
            );
        }
        Err(e) => println!("{}X{} {}", ANSI_RED, ANSI_RESET, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let desc = parse_args(args(&[
            "--width", "256", "--height", "128", "--levels", "3", "--format", "dxt5", "--2d",
        ]))
        .unwrap();
        assert_eq!(desc.width, 256);
        assert_eq!(desc.height, 128);
        assert_eq!(desc.levels, 3);
        assert_eq!(desc.format, TextureFormat::Dxt5);
        assert_eq!(desc.kind, TextureKind::TwoD);
    }

    #[test]
    fn test_parse_cube() {
        let desc = parse_args(args(&["--width", "64", "--height", "64", "--layers", "6", "--cube"]))
            .unwrap();
        assert!(desc.is_cube_map());
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&["--width"])).is_err());
        assert!(parse_args(args(&["--width", "wide"])).is_err());
        assert!(parse_args(args(&["--format", "rgba32"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }
}
