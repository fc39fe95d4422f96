//! End-to-end runs writing real files

use compass_domain::traits::RecordSource;
use compass_domain::{LookupResponse, SeedRecord};
use compass_enricher::{Enricher, EnricherError, JsonFileSink, OutputConfig};
use compass_lookup::MockLookup;
use serde_json::{json, Value};

struct Seeds(Vec<SeedRecord>);

impl RecordSource for Seeds {
    type Error = String;

    async fn fetch_seeds(&self) -> Result<Vec<SeedRecord>, Self::Error> {
        Ok(self.0.clone())
    }
}

fn seeds() -> Seeds {
    Seeds(vec![
        SeedRecord::new("0f1e", "7707083893", Some("ACTIVE".to_string()), "2024-05-01 03:00:00", false),
        SeedRecord::new("2d3c", "0000000000", None, "2024-05-01 03:00:00", false),
    ])
}

fn sberbank() -> LookupResponse {
    LookupResponse::new(
        vec![
            json!({
                "value": "Филиал ПАО Сбербанк Московский банк",
                "data": {
                    "branch_type": "BRANCH",
                    "kpp": "773643001",
                    "address": {
                        "unrestricted_value": "117312, г Москва, ул Вавилова, д 19",
                        "data": {"region_with_type": "г Москва"}
                    }
                }
            }),
            json!({
                "value": "ПАО СБЕРБАНК",
                "data": {
                    "branch_type": "MAIN",
                    "kpp": "773601001",
                    "okpo": "00032537",
                    "okved": "64.19",
                    "name": {"full": "Сбербанк России"},
                    "opf": {"short": "ПАО"},
                    "address": {
                        "unrestricted_value": "117312, г Москва, ул Вавилова, д 19",
                        "data": {
                            "region_with_type": "г Москва",
                            "federal_district": "Центральный",
                            "city": "Москва",
                            "geo_lat": "55.7002",
                            "geo_lon": "37.5807"
                        }
                    },
                    "state": {"status": "ACTIVE", "registration_date": 677376000000u64, "liquidation_date": null}
                }
            }),
        ],
        false,
    )
}

fn read(path: &std::path::Path) -> (String, Value) {
    let text = std::fs::read_to_string(path).unwrap();
    let value = serde_json::from_str(&text).unwrap();
    (text, value)
}

#[tokio::test]
async fn test_run_writes_one_file_per_company() {
    let base = tempfile::tempdir().unwrap();
    let output = OutputConfig {
        base_path: base.path().to_path_buf(),
        ..Default::default()
    };
    let mut sink = JsonFileSink::from_config(&output);

    let mut lookup = MockLookup::new();
    lookup.add_response("7707083893", sberbank());
    lookup.add_error("0000000000");

    let metrics = Enricher::default().run(&seeds(), &lookup, &mut sink).await.unwrap();
    assert_eq!(metrics.written, 2);
    assert_eq!(metrics.branches_mapped, 2);

    let dir = base.path().join("reference_compass").join("update");
    let (text, enriched) = read(&dir.join("update_0.json"));

    assert!(text.contains("КПП 773643001"));
    assert!(text.contains("\n    \"uuid\""));
    assert_eq!(enriched["dadata_company_name"], "ПАО Сбербанк России");
    assert_eq!(enriched["dadata_status"], "ACTIVE");
    assert_eq!(enriched["dadata_registration_date"], "1991-06-20");
    assert_eq!(enriched["dadata_liquidation_date"], Value::Null);
    assert_eq!(enriched["dadata_okpo"], "00032537");
    assert_eq!(enriched["dadata_geo_lat"], "55.7002");
    assert_eq!(enriched["dadata_branch_name"], "Филиал ПАО Сбербанк Московский банк, КПП 773643001\n");
    assert_eq!(enriched["dadata_branch_region"], "г Москва\n");
    assert_eq!(enriched["is_company_name_from_cache"], false);

    let (_, failed) = read(&dir.join("update_1.json"));
    let keys: Vec<&str> = failed.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 8);
    assert_eq!(failed["dadata_branch_name"], Value::Null);
    assert_eq!(failed["dadata_branch_address"], Value::Null);
    assert_eq!(failed["dadata_branch_region"], Value::Null);
    assert!(failed.get("dadata_company_name").is_none());
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let base = tempfile::tempdir().unwrap();
    let blocker = base.path().join("blocked");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut sink = JsonFileSink::new(blocker.join("update"), "update");
    let lookup = MockLookup::new();

    let result = Enricher::default().run(&seeds(), &lookup, &mut sink).await;

    assert!(matches!(result, Err(EnricherError::Sink { index: 0, .. })));
    assert_eq!(lookup.call_count(), 1);
}
