//! Kernel update detection in package update output.

use clap::ValueEnum;

const KERNEL_MARKER: &str = "kernel";

/// Subpackages that carry a bootable kernel image.
const IMAGE_SUBPACKAGES: [&str; 2] = ["core", "rt"];

/// How update output is scanned for a kernel update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KernelMatch {
    /// Any occurrence of the literal `kernel`.
    #[default]
    Substring,
    /// A whitespace-separated token naming a kernel image package.
    Package,
}

impl KernelMatch {
    pub fn detects(self, output: &str) -> bool {
        match self {
            Self::Substring => output.contains(KERNEL_MARKER),
            Self::Package => output.split_whitespace().any(is_kernel_image_token),
        }
    }
}

/// Matches `kernel`, `kernel.x86_64`, `kernel-3.10.0-...`, `kernel-core-4.18`,
/// `kernel-rt...`, but not `kernel-doc`, `kernel-headers` and friends.
fn is_kernel_image_token(token: &str) -> bool {
    let Some(rest) = token.strip_prefix(KERNEL_MARKER) else {
        return false;
    };

    if rest.is_empty() || rest.starts_with('.') {
        return true;
    }

    let Some(suffix) = rest.strip_prefix('-') else {
        return false;
    };

    if suffix.starts_with(|c: char| c.is_ascii_digit()) {
        return true;
    }

    IMAGE_SUBPACKAGES.iter().any(|p| suffix.starts_with(p))
}
