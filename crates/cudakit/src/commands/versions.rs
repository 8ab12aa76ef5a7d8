//! Versions command
//!
//! Lists the catalog of known-available CUDA versions for this host and
//! the requested acquisition method.

use crate::cli::VersionsArgs;
use crate::output;
use anyhow::Result;
use cudakit_core::types::Method;
use cudakit_core::PlatformProfile;

pub fn run(args: VersionsArgs) -> Result<()> {
    let platform = PlatformProfile::detect()?;
    let method: Method = args.method.parse()?;

    output::header(&format!("Available CUDA versions ({method} method)"));
    output::info(&format!("Platform: {platform}"));

    for version in cudakit_links::available_versions(method, platform) {
        println!("  {version}");
    }
    Ok(())
}
