//! Wavefront MTL reader.

use std::collections::HashMap;

use crate::{
    error::ParseError,
    resources::obj::{floats, split_keyword},
};

/// Properties of one `newmtl` record exactly as they appear in the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMaterial {
    pub ka: Option<[f32; 3]>,
    pub kd: Option<[f32; 3]>,
    pub ks: Option<[f32; 3]>,
    pub ke: Option<[f32; 3]>,
    pub ns: Option<f32>,
    pub ni: Option<f32>,
    pub d: Option<f32>,
    pub illum: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MtlKeyword {
    NewMtl,
    Property(MtlProperty),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MtlProperty {
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    Shininess,
    OpticalDensity,
    Dissolve,
    Illum,
}

impl MtlKeyword {
    fn from_token(token: &str) -> Option<Self> {
        let property = match token {
            "newmtl" => return Some(Self::NewMtl),
            "Ka" => MtlProperty::Ambient,
            "Kd" => MtlProperty::Diffuse,
            "Ks" => MtlProperty::Specular,
            "Ke" => MtlProperty::Emissive,
            "Ns" => MtlProperty::Shininess,
            "Ni" => MtlProperty::OpticalDensity,
            "d" => MtlProperty::Dissolve,
            "illum" => MtlProperty::Illum,
            _ => return None,
        };
        Some(Self::Property(property))
    }
}

impl MtlProperty {
    fn apply(self, material: &mut RawMaterial, line: usize, parts: &[&str]) -> Result<(), ParseError> {
        match self {
            Self::Ambient => material.ka = Some(floats::<3>(line, "Ka", parts)?),
            Self::Diffuse => material.kd = Some(floats::<3>(line, "Kd", parts)?),
            Self::Specular => material.ks = Some(floats::<3>(line, "Ks", parts)?),
            Self::Emissive => material.ke = Some(floats::<3>(line, "Ke", parts)?),
            Self::Shininess => material.ns = Some(floats::<1>(line, "Ns", parts)?[0]),
            Self::OpticalDensity => material.ni = Some(floats::<1>(line, "Ni", parts)?[0]),
            Self::Dissolve => material.d = Some(floats::<1>(line, "d", parts)?[0]),
            Self::Illum => {
                let token = parts.first().ok_or(ParseError::MissingComponent {
                    line,
                    keyword: "illum",
                    expected: 1,
                })?;
                let illum = token.parse().map_err(|_| ParseError::InvalidNumber {
                    line,
                    token: token.to_string(),
                })?;
                material.illum = Some(illum);
            }
        }
        Ok(())
    }
}

/**
 * Parse MTL text into a map from material name to its raw record.
 *
 * A name that occurs twice keeps the later record. Properties that appear
 * before the first `newmtl` have no record to attach to and are dropped with a
 * warning, as are unknown keywords.
 */
pub fn parse_mtl(text: &str) -> Result<HashMap<String, RawMaterial>, ParseError> {
    let mut materials = HashMap::new();
    let mut current: Option<(String, RawMaterial)> = None;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let (keyword, args) = split_keyword(line);
        let Some(keyword) = MtlKeyword::from_token(keyword) else {
            log::warn!("unhandled MTL keyword '{}' at line {}", keyword, line_no);
            continue;
        };

        match keyword {
            MtlKeyword::NewMtl => {
                let opened = (args.to_string(), RawMaterial::default());
                if let Some((name, material)) = current.replace(opened) {
                    materials.insert(name, material);
                }
            }
            MtlKeyword::Property(property) => match current.as_mut() {
                Some((_, material)) => {
                    let parts: Vec<&str> = args.split_whitespace().collect();
                    property.apply(material, line_no, &parts)?;
                }
                None => log::warn!("line {}: property outside of any newmtl block dropped", line_no),
            },
        }
    }

    if let Some((name, material)) = current {
        materials.insert(name, material);
    }
    Ok(materials)
}
