use nalgebra::Vector3;

use crate::render::VolumeProperty;

use super::{NormalEncoder, ZERO_NORMAL};

/// Diffuse and specular light intensities per encoded normal.
///
/// Valid for one light direction, view direction and property,
/// rebuilt whenever one of them changes.
#[derive(Debug, Clone)]
pub struct ShadingTables {
    pub diffuse: Vec<f32>,
    pub specular: Vec<f32>,
}

impl ShadingTables {
    /// Tables of an unlit volume, every normal gets full diffuse and no specular
    pub fn unlit(encoder: &NormalEncoder) -> ShadingTables {
        let n = encoder.normals().len();
        ShadingTables {
            diffuse: vec![1.0; n],
            specular: vec![0.0; n],
        }
    }

    /// # Params
    /// * `light_dir` - direction light travels, unit vector, volume space
    /// * `view_dir` - direction of camera rays, unit vector, volume space
    pub fn build(
        encoder: &NormalEncoder,
        property: &VolumeProperty,
        light_dir: Vector3<f32>,
        view_dir: Vector3<f32>,
    ) -> ShadingTables {
        let view_dir_neg = -view_dir;
        let (diffuse, specular) = encoder
            .normals()
            .iter()
            .enumerate()
            .map(|(index, normal)| {
                if index == ZERO_NORMAL as usize {
                    // flat neighbourhood, no direction to light from
                    return (property.diffuse, 0.0);
                }
                let diffuse = f32::max(normal.dot(&-light_dir), 0.0);

                let reflect = light_dir - 2.0 * normal.dot(&light_dir) * normal;
                let r_dot_view = f32::max(0.0, reflect.dot(&view_dir_neg));
                let specular = if diffuse > 0.0 {
                    r_dot_view.powf(property.specular_power) * property.specular
                } else {
                    0.0
                };

                (diffuse * property.diffuse, specular)
            })
            .unzip();

        ShadingTables { diffuse, specular }
    }

    pub fn diffuse(&self, normal: u16) -> f32 {
        self.diffuse[normal as usize]
    }

    pub fn specular(&self, normal: u16) -> f32 {
        self.specular[normal as usize]
    }
}

#[cfg(test)]
mod test {
    use nalgebra::vector;

    use super::*;

    #[test]
    fn facing_the_light() {
        let encoder = NormalEncoder::new();
        let property = VolumeProperty {
            diffuse: 0.8,
            specular: 0.5,
            specular_power: 10.0,
            ..VolumeProperty::default()
        };
        let light = vector![0.0, 0.0, -1.0];
        let tables = ShadingTables::build(&encoder, &property, light, light);

        let towards = encoder.encode(vector![0.0, 0.0, 1.0]);
        let away = encoder.encode(vector![0.0, 0.0, -1.0]);

        assert!((tables.diffuse(towards) - 0.8).abs() < 1e-4);
        assert!((tables.specular(towards) - 0.5).abs() < 1e-4);
        assert_eq!(tables.diffuse(away), 0.0);
        assert_eq!(tables.specular(away), 0.0);
        assert_eq!(tables.diffuse(ZERO_NORMAL), 0.8);
    }
}
