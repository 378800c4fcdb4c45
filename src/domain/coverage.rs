//! Coverage areas: the provinces, regencies and districts a vendor serves.
//!
//! Regions form a strict hierarchy (province > regency > district). A
//! coverage area names a province and optionally narrows it down to one
//! regency and one district of that regency.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CoverageArea, District, Province, Regency};

pub const MAX_COVERAGE_AREAS: usize = 50;
pub const MIN_RADIUS_KM: i32 = 1;
pub const MAX_RADIUS_KM: i32 = 200;
pub const MAX_COVERAGE_SCORE: u32 = 100;

const PROVINCE_POINTS: u32 = 1;
const REGENCY_POINTS: u32 = 2;
const DISTRICT_POINTS: u32 = 3;
const CUSTOM_RADIUS_BONUS: u32 = 1;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CoverageAreaRequest{
    pub province_id: String,
    pub regency_id: Option<String>,
    pub district_id: Option<String>,
    pub custom_radius_km: Option<i32>
}

impl CoverageAreaRequest {
    // Blank ids coming from html forms mean "not specified"
    pub fn normalized(self) -> Self{
        fn clean(id: Option<String>) -> Option<String>{
            id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }

        Self{
            province_id: self.province_id.trim().to_string(),
            regency_id: clean(self.regency_id),
            district_id: clean(self.district_id),
            custom_radius_km: self.custom_radius_km
        }
    }
}

/// Region rows looked up for the ids named in a [`CoverageAreaRequest`].
/// `None` means the id was given but no such region exists, or no id was given.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolvedRegions<'a>{
    pub province: Option<&'a Province>,
    pub regency: Option<&'a Regency>,
    pub district: Option<&'a District>
}

#[derive(Error, Debug, PartialEq)]
pub enum CoverageValidationError{
    #[error("province {0} does not exist")]
    UnknownProvince(String),
    #[error("regency {0} does not exist")]
    UnknownRegency(String),
    #[error("regency {regency} is not part of province {province}")]
    RegencyOutsideProvince{ regency: String, province: String },
    #[error("a district can only be given together with its regency")]
    DistrictWithoutRegency,
    #[error("district {0} does not exist")]
    UnknownDistrict(String),
    #[error("district {district} is not part of regency {regency}")]
    DistrictOutsideRegency{ district: String, regency: String },
    #[error("custom radius must be between {} and {} km, got {0}", MIN_RADIUS_KM, MAX_RADIUS_KM)]
    RadiusOutOfRange(i32),
    #[error("this coverage area is already declared")]
    DuplicateArea,
    #[error("a vendor can declare at most {} coverage areas", MAX_COVERAGE_AREAS)]
    TooManyAreas,
}

pub fn validate_coverage_area(
    request: &CoverageAreaRequest,
    regions: &ResolvedRegions,
    existing: &[CoverageArea]
) -> Result<(), CoverageValidationError>{
    if existing.len() >= MAX_COVERAGE_AREAS {
        return Err(CoverageValidationError::TooManyAreas)
    }

    let province = regions.province
        .filter(|p| p.id == request.province_id)
        .ok_or_else(|| CoverageValidationError::UnknownProvince(request.province_id.clone()))?;

    if let Some(regency_id) = &request.regency_id {
        let regency = regions.regency
            .filter(|r| &r.id == regency_id)
            .ok_or_else(|| CoverageValidationError::UnknownRegency(regency_id.clone()))?;

        if regency.province_id != province.id {
            return Err(CoverageValidationError::RegencyOutsideProvince{
                regency: regency.id.clone(),
                province: province.id.clone()
            })
        }

        if let Some(district_id) = &request.district_id {
            let district = regions.district
                .filter(|d| &d.id == district_id)
                .ok_or_else(|| CoverageValidationError::UnknownDistrict(district_id.clone()))?;

            if district.regency_id != regency.id {
                return Err(CoverageValidationError::DistrictOutsideRegency{
                    district: district.id.clone(),
                    regency: regency.id.clone()
                })
            }
        }
    } else if request.district_id.is_some() {
        return Err(CoverageValidationError::DistrictWithoutRegency)
    }

    if let Some(radius) = request.custom_radius_km {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius) {
            return Err(CoverageValidationError::RadiusOutOfRange(radius))
        }
    }

    let duplicate = existing.iter().any(|area| {
        area.province_id == request.province_id
            && area.regency_id == request.regency_id
            && area.district_id == request.district_id
    });

    if duplicate {
        return Err(CoverageValidationError::DuplicateArea)
    }

    Ok(())
}

// Points contributed by a single area; more specific areas weigh more
pub fn coverage_area_points(area: &CoverageArea) -> u32{
    let base = if area.district_id.is_some() {
        DISTRICT_POINTS
    } else if area.regency_id.is_some() {
        REGENCY_POINTS
    } else {
        PROVINCE_POINTS
    };

    match area.custom_radius_km {
        Some(_) => base + CUSTOM_RADIUS_BONUS,
        None => base
    }
}

pub fn coverage_score(areas: &[CoverageArea]) -> u32{
    areas
        .iter()
        .map(coverage_area_points)
        .sum::<u32>()
        .min(MAX_COVERAGE_SCORE)
}
