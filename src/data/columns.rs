//! Column names expected in the source files and produced by the merge.

pub const SAL_CODE: &str = "SAL_CODE_2021";
pub const MEDIAN_INCOME: &str = "Median_tot_hhd_inc_weekly";

pub const ASGS_STRUCTURE: &str = "ASGS_Structure";
pub const CENSUS_CODE: &str = "Census_Code_2021";
pub const CENSUS_NAME: &str = "Census_Name_2021";

pub const SUBURB: &str = "Suburb";
pub const CRIME_MONTH: &str = "Aug 2021";
pub const CRIME_COUNT: &str = "Aug-21-Crime";

/// Structure type kept from the geography workbook.
pub const SAL_STRUCTURE: &str = "SAL";

/// Column order of the merged table.
pub const MERGED: [&str; 7] = [
    SAL_CODE,
    MEDIAN_INCOME,
    ASGS_STRUCTURE,
    CENSUS_CODE,
    CENSUS_NAME,
    SUBURB,
    CRIME_COUNT,
];
