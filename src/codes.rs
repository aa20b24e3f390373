//! NIfTI code tables referenced by GIFTI documents.
//!
//! Data array intents are stored in documents by name (eg:
//! `NIFTI_INTENT_POINTSET`) and coordinate system spaces by name (eg:
//! `NIFTI_XFORM_TALAIRACH`). These tables translate between those names and
//! the integer codes defined by the NIfTI-1 standard.
//!
//! ```
//! use gifti::codes;
//! assert_eq!(codes::intent_code("NIFTI_INTENT_TRIANGLE"), Some(1009));
//! assert_eq!(codes::xform_name(3), Some("NIFTI_XFORM_TALAIRACH"));
//! ```

pub const INTENT_NONE: &str = "NIFTI_INTENT_NONE";
pub const INTENT_CORREL: &str = "NIFTI_INTENT_CORREL";
pub const INTENT_POINTSET: &str = "NIFTI_INTENT_POINTSET";
pub const INTENT_TRIANGLE: &str = "NIFTI_INTENT_TRIANGLE";
pub const INTENT_LABEL: &str = "NIFTI_INTENT_LABEL";
pub const INTENT_SHAPE: &str = "NIFTI_INTENT_SHAPE";

pub const XFORM_UNKNOWN: i32 = 0;
pub const XFORM_SCANNER_ANAT: i32 = 1;
pub const XFORM_ALIGNED_ANAT: i32 = 2;
pub const XFORM_TALAIRACH: i32 = 3;
pub const XFORM_MNI_152: i32 = 4;
pub const XFORM_TEMPLATE_OTHER: i32 = 5;

static INTENTS: &[(i32, &str)] = &[
    (0, "NIFTI_INTENT_NONE"),
    (2, "NIFTI_INTENT_CORREL"),
    (3, "NIFTI_INTENT_TTEST"),
    (4, "NIFTI_INTENT_FTEST"),
    (5, "NIFTI_INTENT_ZSCORE"),
    (6, "NIFTI_INTENT_CHISQ"),
    (7, "NIFTI_INTENT_BETA"),
    (8, "NIFTI_INTENT_BINOM"),
    (9, "NIFTI_INTENT_GAMMA"),
    (10, "NIFTI_INTENT_POISSON"),
    (11, "NIFTI_INTENT_NORMAL"),
    (12, "NIFTI_INTENT_FTEST_NONC"),
    (13, "NIFTI_INTENT_CHISQ_NONC"),
    (14, "NIFTI_INTENT_LOGISTIC"),
    (15, "NIFTI_INTENT_LAPLACE"),
    (16, "NIFTI_INTENT_UNIFORM"),
    (17, "NIFTI_INTENT_TTEST_NONC"),
    (18, "NIFTI_INTENT_WEIBULL"),
    (19, "NIFTI_INTENT_CHI"),
    (20, "NIFTI_INTENT_INVGAUSS"),
    (21, "NIFTI_INTENT_EXTVAL"),
    (22, "NIFTI_INTENT_PVAL"),
    (23, "NIFTI_INTENT_LOGPVAL"),
    (24, "NIFTI_INTENT_LOG10PVAL"),
    (1001, "NIFTI_INTENT_ESTIMATE"),
    (1002, "NIFTI_INTENT_LABEL"),
    (1003, "NIFTI_INTENT_NEURONAME"),
    (1004, "NIFTI_INTENT_GENMATRIX"),
    (1005, "NIFTI_INTENT_SYMMATRIX"),
    (1006, "NIFTI_INTENT_DISPVECT"),
    (1007, "NIFTI_INTENT_VECTOR"),
    (1008, "NIFTI_INTENT_POINTSET"),
    (1009, "NIFTI_INTENT_TRIANGLE"),
    (1010, "NIFTI_INTENT_QUATERNION"),
    (1011, "NIFTI_INTENT_DIMLESS"),
    (2001, "NIFTI_INTENT_TIME_SERIES"),
    (2002, "NIFTI_INTENT_NODE_INDEX"),
    (2003, "NIFTI_INTENT_RGB_VECTOR"),
    (2004, "NIFTI_INTENT_RGBA_VECTOR"),
    (2005, "NIFTI_INTENT_SHAPE"),
];

static XFORMS: &[(i32, &str)] = &[
    (XFORM_UNKNOWN, "NIFTI_XFORM_UNKNOWN"),
    (XFORM_SCANNER_ANAT, "NIFTI_XFORM_SCANNER_ANAT"),
    (XFORM_ALIGNED_ANAT, "NIFTI_XFORM_ALIGNED_ANAT"),
    (XFORM_TALAIRACH, "NIFTI_XFORM_TALAIRACH"),
    (XFORM_MNI_152, "NIFTI_XFORM_MNI_152"),
    (XFORM_TEMPLATE_OTHER, "NIFTI_XFORM_TEMPLATE_OTHER"),
];

fn code_of(table: &[(i32, &'static str)], name: &str) -> Option<i32> {
    let name = name.trim();
    table.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
}

fn name_of(table: &[(i32, &'static str)], code: i32) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
}

/// Integer code of an intent name
pub fn intent_code(name: &str) -> Option<i32> {
    code_of(INTENTS, name)
}

/// Intent name of an integer code
pub fn intent_name(code: i32) -> Option<&'static str> {
    name_of(INTENTS, code)
}

/// Integer code of a coordinate space name
pub fn xform_code(name: &str) -> Option<i32> {
    code_of(XFORMS, name)
}

/// Coordinate space name of an integer code
pub fn xform_name(code: i32) -> Option<&'static str> {
    name_of(XFORMS, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_lookup() {
        assert_eq!(intent_code(INTENT_POINTSET), Some(1008));
        assert_eq!(intent_code(" NIFTI_INTENT_SHAPE\n"), Some(2005));
        assert_eq!(intent_code("NIFTI_INTENT_BOGUS"), None);
        assert_eq!(intent_name(2), Some("NIFTI_INTENT_CORREL"));
        assert_eq!(intent_name(1), None);
    }

    #[test]
    fn test_tables_are_bijective() {
        for &(code, name) in INTENTS.iter().chain(XFORMS.iter()) {
            let table = if name.starts_with("NIFTI_INTENT") {
                INTENTS
            } else {
                XFORMS
            };
            assert_eq!(code_of(table, name), Some(code));
            assert_eq!(name_of(table, code), Some(name));
        }
    }

    #[test]
    fn test_xform_lookup() {
        assert_eq!(xform_code("NIFTI_XFORM_TALAIRACH"), Some(XFORM_TALAIRACH));
        assert_eq!(xform_name(XFORM_MNI_152), Some("NIFTI_XFORM_MNI_152"));
        assert_eq!(xform_name(42), None);
    }
}
