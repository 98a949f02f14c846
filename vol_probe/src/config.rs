use std::{ffi::OsString, path::PathBuf, str::FromStr};

use clap::ArgMatches;
use nalgebra::{vector, Vector2, Vector3};
use shaded_raycaster::gradient::GradientKind;

/// Parse value of argument `key`
fn parse_value<T>(args: &ArgMatches, key: &str) -> Result<T, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = args
        .value_of(key)
        .ok_or_else(|| format!("missing argument {key}"))?;
    value
        .parse::<T>()
        .map_err(|e| format!("argument {key}: {e}"))
}

/// Transform `Values` into `Vec`
fn parse_values<T>(args: &ArgMatches, key: &str) -> Result<Vec<T>, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    args.values_of(key)
        .ok_or_else(|| format!("missing argument {key}"))?
        .map(|v| v.parse::<T>().map_err(|e| format!("argument {key}: {e}")))
        .collect()
}

fn values_to_vector3<T>(args: &ArgMatches, key: &str) -> Result<Vector3<T>, String>
where
    T: FromStr + Copy + PartialEq + std::fmt::Debug + 'static,
    <T as FromStr>::Err: std::fmt::Display,
{
    match parse_values(args, key)?[..] {
        [x, y, z] => Ok(vector![x, y, z]),
        _ => Err(format!("argument {key} takes 3 values")),
    }
}

fn path_of(args: &ArgMatches, key: &str) -> Result<OsString, String> {
    args.value_of_os(key)
        .map(OsString::from)
        .ok_or_else(|| format!("missing argument {key}"))
}

/// App configuration
/// Config is built from args parsed by `clap`
#[derive(Debug)]
pub enum Config {
    Generate(GenerateConfig),
    Render(RenderConfig),
    Vmi(VmiConfig),
}

impl Config {
    pub fn from_args(args: ArgMatches) -> Result<Config, String> {
        match args.subcommand() {
            Some(("generate", sub)) => Ok(Config::Generate(GenerateConfig::from_args(sub)?)),
            Some(("render", sub)) => Ok(Config::Render(RenderConfig::from_args(sub)?)),
            Some(("vmi", sub)) => Ok(Config::Vmi(VmiConfig::from_args(sub)?)),
            Some((name, _)) => Err(format!("unknown command {name}")),
            None => Err("command required".into()),
        }
    }
}

/// Settings of `generate` command
#[derive(Debug)]
pub struct GenerateConfig {
    /// Dimensions of volume
    pub dims: Vector3<u32>,
    /// Spacing of voxels
    pub spacing: Vector3<f32>,
    /// Type of generator to be used
    pub generator: GeneratorConfig,
    /// Value of voxels outside of objects
    pub background: i16,
    // Output file name
    pub file_name: OsString,
    /// Optional seed for RNG, to replicate results
    pub seed: Option<u64>,
}

impl GenerateConfig {
    fn from_args(args: &ArgMatches) -> Result<GenerateConfig, String> {
        let dims = values_to_vector3(args, "dims")?;
        let spacing = values_to_vector3(args, "spacing")?;
        let generator = GeneratorConfig::from_args(args)?;
        let background = parse_value(args, "background")?;
        let file_name = path_of(args, "output-file")?;
        let seed = match args.is_present("seed") {
            true => Some(parse_value(args, "seed")?),
            false => None,
        };

        Ok(GenerateConfig {
            dims,
            spacing,
            generator,
            background,
            file_name,
            seed,
        })
    }
}

/// Settings specific to generator variant
#[derive(Debug, Clone, Copy)]
pub enum GeneratorConfig {
    /// Randomly placed cuboids and spheres
    Shapes {
        n_of_shapes: usize,
        sample: i16,
        obj_size: u32,
    },
    /// Solid block with empty border
    Solid { sample: i16 },
    /// Ball fading from `sample` in the center to background at its border
    Sphere { sample: i16 },
}

impl GeneratorConfig {
    pub fn from_args(args: &ArgMatches) -> Result<GeneratorConfig, String> {
        let sample = parse_value(args, "sample")?;
        let name = args
            .value_of("generator")
            .ok_or("generator required")?;

        match name {
            "shapes" => Ok(GeneratorConfig::Shapes {
                n_of_shapes: parse_value(args, "n-of-shapes")?,
                sample,
                obj_size: parse_value(args, "object-size")?,
            }),
            "solid" => Ok(GeneratorConfig::Solid { sample }),
            "sphere" => Ok(GeneratorConfig::Sphere { sample }),
            _ => Err(format!("unknown generator {name}")),
        }
    }
}

/// Transfer function presets, see `shaded_raycaster::premade::transfer_functions`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfPreset {
    Gray,
    Bone,
    Skin,
    Generated,
}

impl FromStr for TfPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gray" => Ok(TfPreset::Gray),
            "bone" => Ok(TfPreset::Bone),
            "skin" => Ok(TfPreset::Skin),
            "generated" => Ok(TfPreset::Generated),
            _ => Err(format!("unknown transfer function {s}")),
        }
    }
}

/// How `render` shades the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    Plain,
    Lit,
    Contour,
    Saliency,
}

impl FromStr for ShadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(ShadingMode::Plain),
            "lit" => Ok(ShadingMode::Lit),
            "contour" => Ok(ShadingMode::Contour),
            "saliency" => Ok(ShadingMode::Saliency),
            _ => Err(format!("unknown mode {s}")),
        }
    }
}

/// Arguments shared by commands that render
#[derive(Debug)]
pub struct ViewConfig {
    pub input: PathBuf,
    pub resolution: Vector2<u16>,
    pub tf: TfPreset,
    /// Camera distance in volume diagonals
    pub distance: f32,
    /// `None` means all cores
    pub workers: Option<usize>,
    pub interpolate: bool,
}

impl ViewConfig {
    fn from_args(args: &ArgMatches) -> Result<ViewConfig, String> {
        let input = path_of(args, "input")?.into();
        let resolution = match parse_values::<u16>(args, "resolution")?[..] {
            [w, h] => vector![w, h],
            _ => return Err("argument resolution takes 2 values".into()),
        };
        let workers = match args.is_present("workers") {
            true => Some(parse_value(args, "workers")?),
            false => None,
        };

        Ok(ViewConfig {
            input,
            resolution,
            tf: parse_value(args, "tf")?,
            distance: parse_value(args, "distance")?,
            workers,
            interpolate: args.is_present("interpolate"),
        })
    }
}

/// Settings of `render` command
#[derive(Debug)]
pub struct RenderConfig {
    pub view: ViewConfig,
    pub mode: ShadingMode,
    pub gradient: GradientKind,
    pub contour_threshold: f32,
    /// Specular power, `None` disables highlights
    pub specular: Option<f32>,
    pub file_name: OsString,
}

impl RenderConfig {
    fn from_args(args: &ArgMatches) -> Result<RenderConfig, String> {
        let specular = match args.is_present("specular") {
            true => Some(parse_value(args, "specular")?),
            false => None,
        };

        Ok(RenderConfig {
            view: ViewConfig::from_args(args)?,
            mode: parse_value(args, "mode")?,
            gradient: parse_value(args, "gradient")?,
            contour_threshold: parse_value(args, "contour-threshold")?,
            specular,
            file_name: path_of(args, "output-file")?,
        })
    }
}

/// Settings of `vmi` command
#[derive(Debug)]
pub struct VmiConfig {
    pub view: ViewConfig,
    pub viewpoints: usize,
    pub vomi_output: Option<OsString>,
}

impl VmiConfig {
    fn from_args(args: &ArgMatches) -> Result<VmiConfig, String> {
        Ok(VmiConfig {
            view: ViewConfig::from_args(args)?,
            viewpoints: parse_value(args, "viewpoints")?,
            vomi_output: args.value_of_os("vomi-output").map(OsString::from),
        })
    }
}
