use crate::core::features::{
    coerce_binary_category, coerce_float, coerce_int, encode_gender, encode_smoking_history,
    FeatureError,
};
use crate::models::{Disease, PredictionPayload};

/// How a payload value becomes a numeric feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Integer,
    /// Two-state observation such as "normal"/"abnormal"
    BinaryCategory,
    Gender,
    SmokingHistory,
}

/// A single named input of a disease model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
}

const fn float(key: &'static str) -> FieldSpec {
    FieldSpec { key, kind: FieldKind::Float }
}

const fn int(key: &'static str) -> FieldSpec {
    FieldSpec { key, kind: FieldKind::Integer }
}

const fn binary(key: &'static str) -> FieldSpec {
    FieldSpec { key, kind: FieldKind::BinaryCategory }
}

const DIABETES: &[FieldSpec] = &[
    FieldSpec { key: "gender", kind: FieldKind::Gender },
    float("age"),
    int("hypertension"),
    int("heart_disease"),
    FieldSpec { key: "smoking_history", kind: FieldKind::SmokingHistory },
    float("bmi"),
    float("hba1c_level"),
    float("blood_glucose_level"),
];

const HEART_DISEASE: &[FieldSpec] = &[
    float("age"),
    int("sex"),
    int("cp"),
    float("trestbps"),
    float("chol"),
    int("fbs"),
    int("restecg"),
    float("thalach"),
    int("exang"),
    float("oldpeak"),
    int("slope"),
    int("ca"),
    int("thal"),
];

// Column order of the chronic kidney disease dataset
const KIDNEY_DISEASE: &[FieldSpec] = &[
    float("age"),
    float("bp"),
    float("sg"),
    int("al"),
    int("su"),
    binary("rbc"),
    binary("pc"),
    binary("pcc"),
    binary("ba"),
    float("bgr"),
    float("bu"),
    float("sc"),
    float("sod"),
    float("pot"),
    float("hemo"),
    float("pcv"),
    float("wc"),
    float("rc"),
    binary("htn"),
    binary("dm"),
    binary("cad"),
    binary("appet"),
    binary("pe"),
    binary("ane"),
];

const CANCER: &[FieldSpec] = &[
    float("mean_radius"),
    float("mean_texture"),
    float("mean_perimeter"),
    float("mean_area"),
    float("mean_smoothness"),
];

const PARKINSON: &[FieldSpec] = &[
    float("mdvp_fo"),
    float("mdvp_fhi"),
    float("mdvp_flo"),
    float("mdvp_jitter_percent"),
    float("mdvp_jitter_abs"),
    float("mdvp_rap"),
    float("mdvp_ppq"),
    float("jitter_ddp"),
    float("mdvp_shimmer"),
    float("mdvp_shimmer_db"),
    float("shimmer_apq3"),
    float("shimmer_apq5"),
    float("mdvp_apq"),
    float("shimmer_dda"),
    float("nhr"),
    float("hnr"),
    float("rpde"),
    float("dfa"),
    float("spread1"),
    float("spread2"),
    float("d2"),
    float("ppe"),
];

/// Ordered input fields expected by a disease model
pub fn fields(disease: Disease) -> &'static [FieldSpec] {
    match disease {
        Disease::Diabetes => DIABETES,
        Disease::HeartDisease => HEART_DISEASE,
        Disease::KidneyDisease => KIDNEY_DISEASE,
        Disease::Cancer => CANCER,
        Disease::Parkinson => PARKINSON,
    }
}

impl FieldSpec {
    /// Coerce a present value according to this field's kind
    pub fn encode(&self, value: &serde_json::Value) -> Result<f64, FeatureError> {
        Ok(match self.kind {
            FieldKind::Float => coerce_float(self.key, value)?,
            FieldKind::Integer => coerce_int(self.key, value)? as f64,
            FieldKind::BinaryCategory => coerce_binary_category(self.key, value)? as f64,
            FieldKind::Gender => encode_gender(value) as f64,
            FieldKind::SmokingHistory => encode_smoking_history(value) as f64,
        })
    }
}

/// Build the fixed-order feature vector for a disease
///
/// Every field must be present; the first absent one in schema order is
/// reported. Unknown payload keys are ignored.
pub fn extract_features(
    disease: Disease,
    payload: &PredictionPayload,
) -> Result<Vec<f32>, FeatureError> {
    let fields = fields(disease);

    if let Some(missing) = fields.iter().find(|spec| payload.get(spec.key).is_none()) {
        return Err(FeatureError::MissingField(missing.key.to_string()));
    }

    fields
        .iter()
        .map(|spec| {
            let value = payload
                .get(spec.key)
                .ok_or_else(|| FeatureError::MissingField(spec.key.to_string()))?;
            spec.encode(value).map(|v| v as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn payload(value: Value) -> PredictionPayload {
        match value {
            Value::Object(map) => PredictionPayload::from(map),
            _ => panic!("payload fixtures must be objects"),
        }
    }

    #[test]
    fn test_schema_lengths() {
        assert_eq!(fields(Disease::Diabetes).len(), 8);
        assert_eq!(fields(Disease::HeartDisease).len(), 13);
        assert_eq!(fields(Disease::KidneyDisease).len(), 24);
        assert_eq!(fields(Disease::Cancer).len(), 5);
        assert_eq!(fields(Disease::Parkinson).len(), 22);
    }

    #[test]
    fn test_schema_keys_are_unique() {
        for disease in Disease::ALL {
            let specs = fields(disease);
            for (i, a) in specs.iter().enumerate() {
                assert!(
                    specs[i + 1..].iter().all(|b| b.key != a.key),
                    "duplicate key {} in {}",
                    a.key,
                    disease
                );
            }
        }
    }

    #[test]
    fn test_diabetes_vector() {
        let data = payload(json!({
            "gender": "Male",
            "age": "54",
            "hypertension": 1,
            "heart_disease": "0",
            "smoking_history": "former",
            "bmi": 27.32,
            "hba1c_level": 6.6,
            "blood_glucose_level": 140
        }));

        let features = extract_features(Disease::Diabetes, &data).unwrap();
        assert_eq!(features, vec![1.0, 54.0, 1.0, 0.0, 1.0, 27.32, 6.6, 140.0]);
    }

    #[test]
    fn test_kidney_categoricals_land_in_dataset_order() {
        let mut data = json!({
            "age": 48, "bp": 80, "sg": 1.02, "al": 1, "su": 0,
            "rbc": "normal", "pc": "abnormal", "pcc": "notpresent", "ba": "present",
            "bgr": 121, "bu": 36, "sc": 1.2, "sod": 137, "pot": 4.4, "hemo": 15.4,
            "pcv": 44, "wc": 7800, "rc": 5.2,
            "htn": "yes", "dm": "no", "cad": "no", "appet": "poor", "pe": "no", "ane": 1
        });
        let features = extract_features(Disease::KidneyDisease, &payload(data.clone())).unwrap();

        assert_eq!(features.len(), 24);
        assert_eq!(features[0], 48.0);
        assert_eq!(&features[5..9], &[1.0, 0.0, 0.0, 1.0]);
        assert_eq!(&features[18..], &[1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);

        data["al"] = json!("1.5");
        assert!(matches!(
            extract_features(Disease::KidneyDisease, &payload(data)),
            Err(FeatureError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let data = payload(json!({"mean_radius": 14.1, "mean_texture": 19.3}));
        assert_eq!(
            extract_features(Disease::Cancer, &data),
            Err(FeatureError::MissingField("mean_perimeter".to_string()))
        );
    }

    #[test]
    fn test_missing_field_wins_over_bad_value() {
        let data = payload(json!({"mean_radius": "wide", "mean_texture": 19.3}));
        assert!(matches!(
            extract_features(Disease::Cancer, &data),
            Err(FeatureError::MissingField(_))
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let data = payload(json!({
            "mean_radius": 14.1, "mean_texture": 19.3, "mean_perimeter": 92.0,
            "mean_area": 654.9, "mean_smoothness": 0.096, "patient_name": "n/a"
        }));
        assert_eq!(extract_features(Disease::Cancer, &data).unwrap().len(), 5);
    }
}
