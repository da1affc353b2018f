//! Animal record model.
//!
//! Field names on the wire are the snake_case names the record keeping
//! clients already send. Every scalar is required; list fields default to
//! empty but their entries must be complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coerce;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesName {
    #[serde(with = "coerce::text")]
    pub common: String,
    #[serde(with = "coerce::text")]
    pub scientific: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndividualIdentification {
    #[serde(with = "coerce::text")]
    pub name: String,
    /// Identification code (barcode), unique across all records
    #[serde(with = "coerce::text")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Age {
    #[serde(with = "coerce::date")]
    pub date_of_birth: DateTime<Utc>,
    #[serde(with = "coerce::number")]
    pub estimated_age: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalHistoryEntry {
    /// Storage-assigned identifier of this entry
    #[serde(rename = "_id", default = "entry_id")]
    pub id: String,
    #[serde(with = "coerce::date")]
    pub date: DateTime<Utc>,
    #[serde(with = "coerce::text")]
    pub condition: String,
    #[serde(with = "coerce::text")]
    pub treatment: String,
    #[serde(with = "coerce::text")]
    pub outcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaccinationRecord {
    /// Storage-assigned identifier of this entry
    #[serde(rename = "_id", default = "entry_id")]
    pub id: String,
    #[serde(with = "coerce::date")]
    pub date: DateTime<Utc>,
    #[serde(with = "coerce::text")]
    pub vaccine: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DietAndFeedingSchedule {
    #[serde(with = "coerce::text")]
    pub diet: String,
    #[serde(default, with = "coerce::text_list")]
    pub feeding_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAndMedical {
    #[serde(default)]
    pub medical_history: Vec<MedicalHistoryEntry>,
    #[serde(default)]
    pub vaccination_records: Vec<VaccinationRecord>,
    pub diet_and_feeding_schedule: DietAndFeedingSchedule,
    #[serde(with = "coerce::text")]
    pub behavioral_history: String,
    #[serde(with = "coerce::text")]
    pub reproductive_history: String,
    #[serde(with = "coerce::text")]
    pub current_medications: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnclosureSpecifications {
    #[serde(with = "coerce::text")]
    pub size: String,
    #[serde(with = "coerce::text")]
    pub design: String,
    #[serde(with = "coerce::text")]
    pub temperature: String,
    #[serde(with = "coerce::text")]
    pub humidity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitatAndEnrichment {
    pub enclosure_specifications: EnclosureSpecifications,
    #[serde(default, with = "coerce::text_list")]
    pub enrichment_activities: Vec<String>,
    #[serde(with = "coerce::text")]
    pub cleaning_and_maintenance_schedule: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalAndRegulatory {
    #[serde(with = "coerce::text")]
    pub permits_and_licenses: String,
    #[serde(with = "coerce::text")]
    pub conservation_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrimaryCaretaker {
    #[serde(with = "coerce::text")]
    pub name: String,
    #[serde(with = "coerce::text")]
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingRecord {
    /// Storage-assigned identifier of this entry
    #[serde(rename = "_id", default = "entry_id")]
    pub id: String,
    #[serde(with = "coerce::date")]
    pub date: DateTime<Utc>,
    #[serde(with = "coerce::text")]
    pub training: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffAndCare {
    pub primary_caretaker: PrimaryCaretaker,
    #[serde(with = "coerce::text")]
    pub emergency_protocols: String,
    #[serde(default)]
    pub training_records: Vec<TrainingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitorAndEducational {
    #[serde(with = "coerce::text")]
    pub educational_signage: String,
    #[serde(with = "coerce::text")]
    pub public_interaction_guidelines: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataManagement {
    #[serde(with = "coerce::text")]
    pub record_keeping_system: String,
    #[serde(with = "coerce::text")]
    pub backup_procedures: String,
}

/// A complete animal profile as submitted by clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimalRecord {
    pub species_name: SpeciesName,
    #[serde(with = "coerce::text")]
    pub image: String,
    pub individual_identification: IndividualIdentification,
    #[serde(with = "coerce::text")]
    pub sex: String,
    pub age: Age,
    #[serde(with = "coerce::text")]
    pub origin: String,
    pub health_and_medical: HealthAndMedical,
    pub habitat_and_enrichment: HabitatAndEnrichment,
    pub legal_and_regulatory: LegalAndRegulatory,
    pub staff_and_care: StaffAndCare,
    pub visitor_and_educational: VisitorAndEducational,
    pub data_management: DataManagement,
}

/// An animal record together with its storage-assigned identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub record: AnimalRecord,
}

/// Request body for looking a record up by its identification code.
#[derive(Debug, Clone, Deserialize)]
pub struct BarcodeQuery {
    #[serde(with = "coerce::text")]
    pub barcode: String,
}

fn entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn require(path: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", path)));
    }
    Ok(())
}

impl AnimalRecord {
    /// The identification code used as the external lookup key.
    pub fn barcode(&self) -> &str {
        &self.individual_identification.id
    }

    /// Check that every required text field carries a value.
    ///
    /// Reports the dotted path of the first offending field.
    pub fn validate(&self) -> Result<(), AppError> {
        require("species_name.common", &self.species_name.common)?;
        require("species_name.scientific", &self.species_name.scientific)?;
        require("image", &self.image)?;
        require(
            "individual_identification.name",
            &self.individual_identification.name,
        )?;
        require(
            "individual_identification.id",
            &self.individual_identification.id,
        )?;
        require("sex", &self.sex)?;
        require("origin", &self.origin)?;

        self.health_and_medical.validate()?;
        self.habitat_and_enrichment.validate()?;

        let legal = &self.legal_and_regulatory;
        require(
            "legal_and_regulatory.permits_and_licenses",
            &legal.permits_and_licenses,
        )?;
        require(
            "legal_and_regulatory.conservation_status",
            &legal.conservation_status,
        )?;

        self.staff_and_care.validate()?;

        let visitor = &self.visitor_and_educational;
        require(
            "visitor_and_educational.educational_signage",
            &visitor.educational_signage,
        )?;
        require(
            "visitor_and_educational.public_interaction_guidelines",
            &visitor.public_interaction_guidelines,
        )?;

        let data = &self.data_management;
        require(
            "data_management.record_keeping_system",
            &data.record_keeping_system,
        )?;
        require("data_management.backup_procedures", &data.backup_procedures)?;

        Ok(())
    }
}

impl HealthAndMedical {
    fn validate(&self) -> Result<(), AppError> {
        for (i, entry) in self.medical_history.iter().enumerate() {
            let path = format!("health_and_medical.medical_history[{}]", i);
            require(&format!("{}.condition", path), &entry.condition)?;
            require(&format!("{}.treatment", path), &entry.treatment)?;
            require(&format!("{}.outcome", path), &entry.outcome)?;
        }
        for (i, entry) in self.vaccination_records.iter().enumerate() {
            require(
                &format!("health_and_medical.vaccination_records[{}].vaccine", i),
                &entry.vaccine,
            )?;
        }

        let diet = &self.diet_and_feeding_schedule;
        require("health_and_medical.diet_and_feeding_schedule.diet", &diet.diet)?;
        for (i, time) in diet.feeding_times.iter().enumerate() {
            require(
                &format!(
                    "health_and_medical.diet_and_feeding_schedule.feeding_times[{}]",
                    i
                ),
                time,
            )?;
        }

        require(
            "health_and_medical.behavioral_history",
            &self.behavioral_history,
        )?;
        require(
            "health_and_medical.reproductive_history",
            &self.reproductive_history,
        )?;
        require(
            "health_and_medical.current_medications",
            &self.current_medications,
        )
    }
}

impl HabitatAndEnrichment {
    fn validate(&self) -> Result<(), AppError> {
        let enclosure = &self.enclosure_specifications;
        let prefix = "habitat_and_enrichment.enclosure_specifications";
        require(&format!("{}.size", prefix), &enclosure.size)?;
        require(&format!("{}.design", prefix), &enclosure.design)?;
        require(&format!("{}.temperature", prefix), &enclosure.temperature)?;
        require(&format!("{}.humidity", prefix), &enclosure.humidity)?;

        for (i, activity) in self.enrichment_activities.iter().enumerate() {
            require(
                &format!("habitat_and_enrichment.enrichment_activities[{}]", i),
                activity,
            )?;
        }

        require(
            "habitat_and_enrichment.cleaning_and_maintenance_schedule",
            &self.cleaning_and_maintenance_schedule,
        )
    }
}

impl StaffAndCare {
    fn validate(&self) -> Result<(), AppError> {
        require(
            "staff_and_care.primary_caretaker.name",
            &self.primary_caretaker.name,
        )?;
        require(
            "staff_and_care.primary_caretaker.contact",
            &self.primary_caretaker.contact,
        )?;
        require(
            "staff_and_care.emergency_protocols",
            &self.emergency_protocols,
        )?;
        for (i, record) in self.training_records.iter().enumerate() {
            require(
                &format!("staff_and_care.training_records[{}].training", i),
                &record.training,
            )?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::animal_json;
    use super::*;

    fn parse(value: serde_json::Value) -> AnimalRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_complete_record_validates() {
        let record = parse(animal_json("A-001"));
        assert!(record.validate().is_ok());
        assert_eq!(record.barcode(), "A-001");
    }

    #[test]
    fn test_missing_group_fails_to_parse() {
        let mut body = animal_json("A-001");
        body.as_object_mut().unwrap().remove("legal_and_regulatory");
        assert!(serde_json::from_value::<AnimalRecord>(body).is_err());

        let mut body = animal_json("A-001");
        body["age"].as_object_mut().unwrap().remove("estimated_age");
        assert!(serde_json::from_value::<AnimalRecord>(body).is_err());
    }

    #[test]
    fn test_empty_text_reports_path() {
        let mut body = animal_json("A-001");
        body["health_and_medical"]["medical_history"][0]["outcome"] = "".into();
        let err = parse(body).validate().unwrap_err();
        assert_eq!(
            err.message(),
            "health_and_medical.medical_history[0].outcome is required"
        );

        let mut body = animal_json("");
        body["sex"] = "".into();
        let err = parse(body).validate().unwrap_err();
        assert_eq!(err.message(), "individual_identification.id is required");
    }

    #[test]
    fn test_whitespace_text_is_present() {
        let mut body = animal_json("A-001");
        body["origin"] = " ".into();
        let record = parse(body);
        assert!(record.validate().is_ok());
        assert_eq!(record.origin, " ");
    }

    #[test]
    fn test_scalars_become_text() {
        let mut body = animal_json("A-001");
        body["habitat_and_enrichment"]["enclosure_specifications"]["temperature"] = 22.into();
        body["habitat_and_enrichment"]["enclosure_specifications"]["humidity"] = 0.65.into();
        body["health_and_medical"]["current_medications"] = false.into();
        body["health_and_medical"]["diet_and_feeding_schedule"]["feeding_times"] =
            serde_json::json!([800, "16:00"]);

        let record = parse(body);
        let enclosure = &record.habitat_and_enrichment.enclosure_specifications;
        assert_eq!(enclosure.temperature, "22");
        assert_eq!(enclosure.humidity, "0.65");
        assert_eq!(record.health_and_medical.current_medications, "false");
        assert_eq!(
            record.health_and_medical.diet_and_feeding_schedule.feeding_times,
            vec!["800".to_string(), "16:00".to_string()]
        );
    }

    #[test]
    fn test_text_rejects_null_and_objects() {
        let mut body = animal_json("A-001");
        body["sex"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<AnimalRecord>(body).is_err());

        let mut body = animal_json("A-001");
        body["image"] = serde_json::json!({ "url": "x" });
        assert!(serde_json::from_value::<AnimalRecord>(body).is_err());
    }

    #[test]
    fn test_list_entries_get_ids() {
        let record = parse(animal_json("A-001"));
        let entry = &record.health_and_medical.medical_history[0];
        assert!(uuid::Uuid::parse_str(&entry.id).is_ok());
        assert!(!record.health_and_medical.vaccination_records[0].id.is_empty());
        assert!(!record.staff_and_care.training_records[0].id.is_empty());

        // A supplied id is kept, so stored documents decode to the same ids.
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(parse(json.clone()), record);
        assert_eq!(
            json["health_and_medical"]["medical_history"][0]["_id"],
            entry.id.as_str()
        );
    }

    #[test]
    fn test_lists_default_to_empty() {
        let mut body = animal_json("A-002");
        body["health_and_medical"]
            .as_object_mut()
            .unwrap()
            .remove("medical_history");
        body["staff_and_care"]
            .as_object_mut()
            .unwrap()
            .remove("training_records");
        let record = parse(body);
        assert!(record.health_and_medical.medical_history.is_empty());
        assert!(record.staff_and_care.training_records.is_empty());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_stored_record_flattens_with_id() {
        let stored = StoredRecord {
            id: "abc".to_string(),
            record: parse(animal_json("A-001")),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["individual_identification"]["id"], "A-001");
        assert_eq!(json["age"]["date_of_birth"], "2019-05-14T00:00:00.000Z");
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let mut body = animal_json("A-003");
        body["favourite_colour"] = "green".into();
        let json = serde_json::to_value(parse(body)).unwrap();
        assert!(json.get("favourite_colour").is_none());
    }
}
