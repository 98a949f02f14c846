//! Argument parsing and validation
//! Uses library `clap`

use std::ffi::OsStr;

use clap::{Arg, Command, ValueHint};

// up to 32bit value
pub fn is_positive_number(num: &str) -> Result<(), String> {
    let n = num.parse::<u32>();
    match n {
        Ok(n) => {
            if n > 0 {
                Ok(())
            } else {
                Err("Number must be greater than 0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

pub fn can_fit_i16(num: &str) -> Result<(), String> {
    let n = num.parse::<i16>();
    match n {
        Ok(_) => Ok(()),
        Err(_) => Err("Number does not fit in range <-32768;32767>".into()),
    }
}

pub fn can_fit_u16(num: &str) -> Result<(), String> {
    let n = num.parse::<u16>();
    match n {
        Ok(_) => Ok(()),
        Err(_) => Err("Number does not fit in range <0;65535>".into()),
    }
}

pub fn is_float_number(num: &str) -> Result<(), String> {
    let n = num.parse::<f32>();
    match n {
        Ok(n) => {
            if n > 0.0 {
                Ok(())
            } else {
                Err("Number must be greater than 0.0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

pub fn is_unit_float(num: &str) -> Result<(), String> {
    let n = num.parse::<f32>();
    match n {
        Ok(n) if (0.0..=1.0).contains(&n) => Ok(()),
        Ok(_) => Err("Number must be in range <0;1>".into()),
        Err(_) => Err("Number required".into()),
    }
}

pub const GENERATOR_NAMES: &[&str] = &["shapes", "solid", "sphere"];
pub const MODE_NAMES: &[&str] = &["plain", "lit", "contour", "saliency"];
pub const GRADIENT_NAMES: &[&str] = &["fd", "regression-1", "regression-2"];
pub const TF_NAMES: &[&str] = &["gray", "bone", "skin", "generated"];

fn input_arg<'a>() -> Arg<'a> {
    Arg::new("input")
        .help("Volume file")
        .required(true)
        .value_name("FILE")
        .allow_invalid_utf8(true)
        .value_hint(ValueHint::FilePath)
}

fn output_arg<'a>(default: &'static str) -> Arg<'a> {
    Arg::new("output-file")
        .help("File name to output")
        .long("output-file")
        .short('o')
        .value_name("FILE")
        .allow_invalid_utf8(true)
        .value_hint(ValueHint::FilePath)
        .default_value_os(OsStr::new(default))
}

fn resolution_arg<'a>() -> Arg<'a> {
    Arg::new("resolution")
        .help("Resolution of rendered image")
        .long("resolution")
        .short('r')
        .number_of_values(2)
        .value_names(&["W", "H"])
        .use_value_delimiter(true)
        .require_value_delimiter(true)
        .require_equals(true)
        .default_values(&["512", "512"])
        .validator(|s| is_positive_number(s).and(can_fit_u16(s)))
}

fn render_args<'a>(cmd: Command<'a>) -> Command<'a> {
    cmd.arg(input_arg())
        .arg(resolution_arg())
        .arg(
            Arg::new("tf")
                .help("Transfer function preset")
                .long("tf")
                .default_value("gray")
                .value_name("NAME")
                .possible_values(TF_NAMES),
        )
        .arg(
            Arg::new("distance")
                .help("Distance of camera from the volume center, in volume diagonals")
                .long("distance")
                .value_name("D")
                .default_value("1.5")
                .validator(is_float_number),
        )
        .arg(
            Arg::new("workers")
                .help("Number of render threads, leave out to use all cores")
                .long("workers")
                .short('w')
                .value_name("N")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("interpolate")
                .help("Trilinear interpolation of samples")
                .long("interpolate"),
        )
}

fn generate_command<'a>() -> Command<'a> {
    Command::new("generate")
        .about("Generate synthetic volume")
        .arg(
            Arg::new("dims")
                .help("Dimensions of volume")
                .long("dims")
                .short('d')
                .required(true)
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("spacing")
                .help("Spacing of voxels")
                .long("spacing")
                .short('s')
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .default_values(&["1", "1", "1"])
                .validator(is_float_number),
        )
        .arg(
            Arg::new("generator")
                .help("Type of generator")
                .long("generator")
                .short('g')
                .required(true)
                .requires_ifs(&[("shapes", "n-of-shapes"), ("shapes", "object-size")])
                .takes_value(true)
                .value_name("NAME")
                .possible_values(GENERATOR_NAMES),
        )
        .arg(
            Arg::new("seed")
                .help("Seed for RNG, leave out for random seed")
                .long("seed")
                .value_name("SEED")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("sample")
                .help("Value of generated objects")
                .long("sample")
                .value_name("VALUE")
                .default_value("1000")
                .allow_hyphen_values(true)
                .validator(can_fit_i16),
        )
        .arg(
            Arg::new("background")
                .help("Value of empty space")
                .long("background")
                .value_name("VALUE")
                .default_value("0")
                .allow_hyphen_values(true)
                .validator(can_fit_i16),
        )
        .arg(
            Arg::new("object-size")
                .help("Size of individual generated objects")
                .long("object-size")
                .value_name("SIDE")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("n-of-shapes")
                .help("Number of shapes generated in volume")
                .long("n-of-shapes")
                .value_name("N")
                .validator(is_positive_number),
        )
        .arg(output_arg("a.vol"))
}

fn render_command<'a>() -> Command<'a> {
    let cmd = Command::new("render")
        .about("Render one image of a volume")
        .arg(
            Arg::new("mode")
                .help("Shading of the image")
                .long("mode")
                .short('m')
                .default_value("lit")
                .value_name("MODE")
                .possible_values(MODE_NAMES),
        )
        .arg(
            Arg::new("gradient")
                .help("Gradient estimator for shading")
                .long("gradient")
                .default_value("fd")
                .value_name("NAME")
                .possible_values(GRADIENT_NAMES),
        )
        .arg(
            Arg::new("contour-threshold")
                .help("Samples with normal this close to perpendicular are outlined")
                .long("contour-threshold")
                .value_name("T")
                .default_value("0.3")
                .validator(is_unit_float),
        )
        .arg(
            Arg::new("specular")
                .help("Specular power, leave out to disable highlights")
                .long("specular")
                .value_name("POWER")
                .validator(is_float_number),
        )
        .arg(output_arg("render.ppm"));
    render_args(cmd)
}

fn vmi_command<'a>() -> Command<'a> {
    let cmd = Command::new("vmi")
        .about("Compute viewpoint mutual information over viewpoints on a sphere")
        .arg(
            Arg::new("viewpoints")
                .help("Number of viewpoints")
                .long("viewpoints")
                .short('n')
                .value_name("N")
                .default_value("12")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("vomi-output")
                .help("Also render voxel mutual information from the best viewpoint into FILE")
                .long("vomi-output")
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath),
        );
    render_args(cmd)
}

pub fn get_command<'a>() -> Command<'a> {
    Command::new("Vol-probe")
        .version("0.1.0")
        .about("Volume generator, renderer and viewpoint information probe")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(render_command())
        .subcommand(vmi_command())
}
