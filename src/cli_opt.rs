//! CLI options.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use crate::primitive::Primitive;

/// CLI options.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct CliOpt {
    /// FBX file. A built-in primitive is shown if omitted.
    pub fbx_path: Option<PathBuf>,
    /// Diffuse texture image.
    #[arg(long)]
    pub texture: Option<PathBuf>,
    /// Primitive to show when no FBX file is given.
    #[arg(long, value_enum, default_value_t = Primitive::Cube)]
    pub primitive: Primitive,
    /// Uniform scale applied to the loaded meshes.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,
    /// Initial window width.
    #[arg(long, default_value_t = 512)]
    pub width: u32,
    /// Initial window height.
    #[arg(long, default_value_t = 512)]
    pub height: u32,
    /// Frame rate cap.
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Auto rotation in degrees per frame.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub spin: f32,
}

impl CliOpt {
    /// Checks option values which clap cannot check by itself.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            bail!("Scale must be a positive number: got {}", self.scale);
        }
        if self.width == 0 || self.height == 0 {
            bail!(
                "Window size must not be zero: got {}x{}",
                self.width,
                self.height
            );
        }
        if self.fps == 0 {
            bail!("FPS must not be zero");
        }
        if !self.spin.is_finite() {
            bail!("Spin must be finite: got {}", self.spin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opt = CliOpt::try_parse_from(["viewer"]).unwrap();
        assert!(opt.fbx_path.is_none());
        assert!(opt.texture.is_none());
        assert_eq!(opt.primitive, Primitive::Cube);
        assert_eq!(opt.scale, 1.0);
        assert_eq!((opt.width, opt.height), (512, 512));
        assert_eq!(opt.fps, 60);
        assert_eq!(opt.spin, 0.0);
        opt.validate().unwrap();
    }

    #[test]
    fn full_command_line() {
        let opt = CliOpt::try_parse_from([
            "viewer",
            "model.fbx",
            "--texture",
            "tex.png",
            "--primitive",
            "triangle",
            "--scale",
            "0.5",
            "--fps",
            "30",
            "--spin",
            "-0.5",
        ])
        .unwrap();
        assert_eq!(opt.fbx_path, Some(PathBuf::from("model.fbx")));
        assert_eq!(opt.texture, Some(PathBuf::from("tex.png")));
        assert_eq!(opt.primitive, Primitive::Triangle);
        assert_eq!(opt.scale, 0.5);
        assert_eq!(opt.fps, 30);
        assert_eq!(opt.spin, -0.5);
        opt.validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let base = CliOpt::try_parse_from(["viewer"]).unwrap();

        let opt = CliOpt {
            scale: 0.0,
            ..base.clone()
        };
        assert!(opt.validate().is_err());

        let opt = CliOpt {
            width: 0,
            ..base.clone()
        };
        assert!(opt.validate().is_err());

        let opt = CliOpt { fps: 0, ..base };
        assert!(opt.validate().is_err());
    }

    #[test]
    fn rejects_unknown_primitive() {
        assert!(CliOpt::try_parse_from(["viewer", "--primitive", "teapot"]).is_err());
    }
}
