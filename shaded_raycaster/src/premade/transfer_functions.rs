use crate::transfer_function::TransferFunction;

// Values are normalized: original sample + shift.
// CT presets take the shift so they can be written in Hounsfield units.

/// Gray ramp over the whole range, opacity grows with value
pub fn gray_ramp(range_max: u16) -> TransferFunction {
    let max = range_max as f32;
    TransferFunction::new()
        .with_color(0.0, 0.0, 0.0, 0.0)
        .with_color(max, 1.0, 1.0, 1.0)
        .with_opacity(0.0, 0.0)
        .with_opacity(max, 0.5)
}

/// Opaque bone, everything below 200 HU is transparent
pub fn ct_bone(shift: f32) -> TransferFunction {
    let hu = |v: f32| v + shift;
    TransferFunction::new()
        .with_color(hu(200.0), 0.89, 0.85, 0.79)
        .with_color(hu(1500.0), 1.0, 1.0, 1.0)
        .with_opacity(hu(199.0), 0.0)
        .with_opacity(hu(300.0), 0.8)
        .with_opacity(hu(1500.0), 1.0)
}

/// Faint skin over bone
pub fn ct_skin_bone(shift: f32) -> TransferFunction {
    let hu = |v: f32| v + shift;
    TransferFunction::new()
        .with_color(hu(-600.0), 0.9, 0.6, 0.45)
        .with_color(hu(100.0), 0.9, 0.6, 0.45)
        .with_color(hu(300.0), 0.89, 0.85, 0.79)
        .with_opacity(hu(-601.0), 0.0)
        .with_opacity(hu(-400.0), 0.02)
        .with_opacity(hu(100.0), 0.02)
        .with_opacity(hu(300.0), 0.7)
}

/// For volumes made by the generator: background 0, objects above
pub fn generated(range_max: u16) -> TransferFunction {
    let max = range_max as f32;
    TransferFunction::new()
        .with_color(1.0, 0.2, 0.4, 0.9)
        .with_color(max, 1.0, 0.9, 0.6)
        .with_opacity(0.5, 0.0)
        .with_opacity(1.0, 0.05)
        .with_opacity(max, 0.4)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bone_is_shifted() {
        let tf = ct_bone(1024.0);
        assert_eq!(tf.opacity(1024.0), 0.0);
        assert!(tf.opacity(1024.0 + 1000.0) > 0.8);
    }

    #[test]
    fn generated_background_is_transparent() {
        let tf = generated(255);
        assert_eq!(tf.opacity(0.0), 0.0);
        assert!(tf.opacity(200.0) > 0.0);
    }
}
