use std::error::Error;

use datum_metadata::{DatumMetadata, InfoMap, InfoValue};

fn test_metadata() -> DatumMetadata {
    let mut info = InfoMap::new();
    info.insert("msg".to_string(), "Hello, world.".into());
    let mut metadata = DatumMetadata::new();
    metadata.set_info(info);
    metadata.add_tag("test");
    metadata
}

#[test]
fn serialize_json() {
    let json = serde_json::to_string(&test_metadata()).unwrap();
    assert_eq!(json, r#"{"m":{"msg":"Hello, world."},"t":["test"]}"#);
}

#[test]
fn serialize_json_with_property_meta() {
    let mut metadata = test_metadata();
    metadata.put_property_info_value("watts", "unit", Some("W".into()));
    let json = serde_json::to_string(&metadata).unwrap();
    assert_eq!(
        json,
        r#"{"m":{"msg":"Hello, world."},"pm":{"watts":{"unit":"W"}},"t":["test"]}"#
    );
}

#[test]
fn deserialize_json() -> Result<(), Box<dyn Error>> {
    let json = r#"{"m":{"ploc":2502287},"t":["test"]}"#;
    let metadata: DatumMetadata = serde_json::from_str(json)?;
    assert_eq!(metadata.info_long("ploc"), Some(2_502_287));
    assert!(metadata.has_tag("test"));
    Ok(())
}

#[test]
fn deserialize_json_with_property_meta() -> Result<(), Box<dyn Error>> {
    let json = r#"{"m":{"ploc":2502287},"pm":{"watts":{"unit":"W"}},"t":["test"]}"#;
    let metadata = DatumMetadata::from_json(json)?;
    assert_eq!(metadata.info_long("ploc"), Some(2_502_287));
    assert_eq!(
        metadata.property_info_string("watts", "unit").as_deref(),
        Some("W")
    );
    assert!(metadata.has_tag("test"));
    Ok(())
}

#[test]
fn deserialize_json_with_nested_meta() -> Result<(), Box<dyn Error>> {
    let json = r#"{"m":{"map":{"foo":1,"bar":"bam"}}}"#;
    let metadata = DatumMetadata::from_json(json)?;
    let Some(InfoValue::Map(map)) = metadata.info().get("map") else {
        panic!("nested map not parsed");
    };
    assert_eq!(map.get("foo"), Some(&InfoValue::from(1)));
    assert_eq!(map.get("bar"), Some(&InfoValue::from("bam")));
    assert_eq!(map.get("foo").and_then(InfoValue::as_str), None);
    Ok(())
}

#[test]
fn remove_info_key() {
    let mut metadata = test_metadata();
    metadata.put_info_value("msg", None);
    metadata.put_info_value("does.not.exist", None);
    metadata.put_property_info_value("foo", "bar", Some("bam".into()));
    metadata.put_property_info_value("foo", "bar", None);
    assert!(metadata.info_string("msg").is_none());
    assert!(metadata.property_info_string("foo", "bar").is_none());
    assert!(metadata.property_info("foo").is_none());
    assert_eq!(metadata.to_json(), r#"{"t":["test"]}"#);
}

#[test]
fn round_trip_file() -> Result<(), Box<dyn Error>> {
    let json = include_str!("data/datum_metadata.json");
    let json: serde_json::Value = serde_json::from_str(json)?;

    let metadata = DatumMetadata::from_value(json.clone())?;
    println!("{metadata:#?}");
    assert_eq!(metadata.info_string("ratio").as_deref(), Some("0.950"));
    assert_eq!(metadata.info_bool("enabled"), Some(true));
    assert_eq!(metadata.property_info_integer("watts", "scale"), Some(3));
    assert_eq!(
        metadata
            .info_map("map")
            .and_then(|map| map.get("nested"))
            .and_then(InfoValue::as_map)
            .and_then(|nested| nested.get("depth"))
            .and_then(InfoValue::to_i64),
        Some(2)
    );
    assert_eq!(
        metadata.tags().iter().map(String::as_str).collect::<Vec<_>>(),
        ["test", "solar"]
    );

    let json_cmp = metadata.to_value();
    assert_eq!(json, json_cmp);
    assert_eq!(DatumMetadata::from_json(&metadata.to_json_pretty())?, metadata);
    Ok(())
}

#[test]
fn embedded_in_domain_type() -> Result<(), Box<dyn Error>> {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Datum {
        source_id: String,
        #[serde(default, skip_serializing_if = "DatumMetadata::is_empty")]
        meta: DatumMetadata,
    }

    let datum = Datum {
        source_id: "inverter/1".to_string(),
        meta: DatumMetadata::new().with_property_info_value("watts", "unit", "W"),
    };
    let json = serde_json::to_string(&datum)?;
    assert_eq!(
        json,
        r#"{"source_id":"inverter/1","meta":{"pm":{"watts":{"unit":"W"}}}}"#
    );
    assert_eq!(serde_json::from_str::<Datum>(&json)?, datum);

    let datum: Datum = serde_json::from_str(r#"{"source_id":"meter/1"}"#)?;
    assert!(datum.meta.is_empty());

    let err = serde_json::from_str::<Datum>(r#"{"source_id":"meter/1","meta":{"pm":[]}}"#)
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("field pm must be a JSON object, found array"));
    Ok(())
}
