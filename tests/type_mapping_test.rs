//! Integration tests for mapping behavior shared across providers
//!
//! Covers literal generation, converter composition, cloning, Oracle binary
//! parameter sizing and reader accessor selection through the public API.

use std::sync::Arc;

use proptest::prelude::*;
use relmap::prelude::*;
use relmap::type_mapping::converter::{ComposedConverter, FnValueConverter};
use relmap::type_mapping::converters::{EnumToNumberConverter, GuidToBytesConverter, GuidToStringConverter};
use relmap::type_mapping::mappings::{
    BoolTypeMapping, ByteArrayTypeMapping, DateTimeTypeMapping, DecimalTypeMapping, FloatingPointTypeMapping,
    GuidTypeMapping, IntegerTypeMapping, JsonTypeMapping, NullTypeMapping, StringTypeMapping,
};
use relmap::type_mapping::providers::{
    OracleByteArrayTypeMapping, PostgresBoolTypeMapping, PostgresByteArrayTypeMapping, SqlServerByteArrayTypeMapping,
    SqlServerStringTypeMapping, ORACLE_MAX_BINARY_SIZE,
};
use relmap::type_mapping::{CoreTypeMappingParameters, RelationalTypeMappingParameters, ValueComparer};
use uuid::Uuid;

fn every_variant() -> Vec<Arc<dyn RelationalTypeMapping>> {
    vec![
        Arc::new(StringTypeMapping::new("varchar(50)", false, Some(50), false).unwrap()),
        Arc::new(ByteArrayTypeMapping::new("varbinary(16)", Some(16), false).unwrap()),
        Arc::new(IntegerTypeMapping::new("integer", AppType::I32).unwrap()),
        Arc::new(FloatingPointTypeMapping::new("double precision", AppType::F64).unwrap()),
        Arc::new(DecimalTypeMapping::new("numeric(18,2)", Some(18), Some(2)).unwrap()),
        Arc::new(BoolTypeMapping::new("boolean").unwrap()),
        Arc::new(GuidTypeMapping::new("uuid").unwrap()),
        Arc::new(DateTimeTypeMapping::new("timestamp", AppType::DateTime).unwrap()),
        Arc::new(JsonTypeMapping::new("json").unwrap()),
        NullTypeMapping::instance() as Arc<dyn RelationalTypeMapping>,
        Arc::new(OracleByteArrayTypeMapping::new("RAW(2000)", Some(2000)).unwrap()),
        Arc::new(SqlServerByteArrayTypeMapping::new("varbinary(max)", None, false).unwrap()),
        Arc::new(SqlServerStringTypeMapping::new("nvarchar(100)", true, Some(100), false).unwrap()),
        Arc::new(PostgresBoolTypeMapping::new("boolean").unwrap()),
        Arc::new(PostgresByteArrayTypeMapping::new("bytea").unwrap()),
    ]
}

fn oracle_raw(size: Option<i32>) -> OracleByteArrayTypeMapping {
    let store_type = match size {
        Some(size) => format!("RAW({size})"),
        None => "BLOB".to_string(),
    };
    OracleByteArrayTypeMapping::new(&store_type, size).unwrap()
}

#[test]
fn test_absent_value_renders_null_for_every_variant() {
    for mapping in every_variant() {
        assert_eq!(mapping.generate_sql_literal(None).unwrap(), "NULL", "{}", mapping.store_type());
        assert_eq!(mapping.generate_provider_value_sql_literal(None).unwrap(), "NULL");
    }
}

#[test]
fn test_non_null_path_rejects_absent_value() {
    for mapping in every_variant() {
        let err = mapping.render_literal(None).unwrap_err();
        assert!(matches!(err, MappingError::InvalidArgument(_)), "{}", mapping.store_type());
    }
}

#[test]
fn test_converter_returning_none_renders_null() {
    let blank_is_null = FnValueConverter::new(
        AppType::String,
        AppType::String,
        |value| match value.as_text() {
            Some("") => Ok(None),
            _ => Ok(Some(value.clone())),
        },
        |value| Ok(Some(value.clone())),
    );
    let mapping = StringTypeMapping::new("varchar(20)", false, Some(20), false)
        .unwrap()
        .clone_with_converter(Arc::new(blank_is_null));

    assert_eq!(mapping.generate_sql_literal(Some(&DbValue::from(""))).unwrap(), "NULL");
    assert_eq!(mapping.generate_sql_literal(Some(&DbValue::from("x"))).unwrap(), "'x'");

    let parameter = mapping
        .create_parameter(&RelationalCommand::new("q"), "@p", Some(&DbValue::from("")), None)
        .unwrap();
    assert!(parameter.is_db_null());
}

#[test]
fn test_converter_literal_matches_provider_literal() {
    let storage = ByteArrayTypeMapping::new("varbinary(16)", Some(16), false).unwrap();
    let mapping = storage.clone_with_converter(Arc::new(GuidToBytesConverter::default()));
    let id = Uuid::new_v4();

    let through_converter = mapping.generate_sql_literal(Some(&DbValue::Uuid(id))).unwrap();
    let direct = storage
        .generate_sql_literal(Some(&DbValue::Bytes(id.as_bytes().to_vec())))
        .unwrap();
    assert_eq!(through_converter, direct);
}

#[test]
fn test_clone_with_store_type_and_size_preserves_facets() {
    let mapping = StringTypeMapping::new("nvarchar(50)", true, Some(50), false)
        .unwrap()
        .clone_with_converter(Arc::new(GuidToStringConverter::default()));

    let resized = mapping.clone_with_store_type_and_size("nvarchar(80)", Some(80)).unwrap();
    assert_eq!(resized.store_type(), "nvarchar(80)");
    assert_eq!(resized.size(), Some(80));
    assert!(resized.is_unicode());
    assert!(!resized.is_fixed_length());
    assert_eq!(resized.wire_type(), mapping.wire_type());
    assert_eq!(resized.application_type(), &AppType::Uuid);
    assert!(resized.converter().is_some());

    // Same arguments again give an equivalent mapping
    let again = resized.clone_with_store_type_and_size("nvarchar(80)", Some(80)).unwrap();
    assert_eq!(again.store_type(), resized.store_type());
    assert_eq!(again.size(), resized.size());

    assert!(matches!(
        mapping.clone_with_store_type_and_size("", Some(1)),
        Err(MappingError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_null_mapping_clones_are_the_singleton() {
    let null: Arc<dyn RelationalTypeMapping> = NullTypeMapping::instance();
    let resized = null.clone_with_store_type_and_size("int", Some(4)).unwrap();
    let converted = null.clone_with_converter(Arc::new(GuidToStringConverter::default()));
    assert!(Arc::ptr_eq(&null, &resized));
    assert!(Arc::ptr_eq(&null, &converted));
    assert_eq!(resized.generate_sql_literal(Some(&DbValue::I32(1))).unwrap(), "NULL");
}

#[test]
fn test_composition_order() {
    let add_one = Arc::new(FnValueConverter::new(
        AppType::I64,
        AppType::I64,
        |value| Ok(value.as_i64().map(|v| DbValue::I64(v + 1))),
        |value| Ok(value.as_i64().map(|v| DbValue::I64(v - 1))),
    ));
    let double = Arc::new(FnValueConverter::new(
        AppType::I64,
        AppType::I64,
        |value| Ok(value.as_i64().map(|v| DbValue::I64(v * 2))),
        |value| Ok(value.as_i64().map(|v| DbValue::I64(v / 2))),
    ));

    let composed = ComposedConverter::new(add_one.clone(), double.clone());
    assert_eq!(composed.convert_to_provider(&DbValue::I64(3)).unwrap(), Some(DbValue::I64(8)));
    assert_eq!(composed.convert_from_provider(&DbValue::I64(8)).unwrap(), Some(DbValue::I64(3)));

    // The converter added last runs first on the way to the provider
    let mapping = IntegerTypeMapping::new("bigint", AppType::I64)
        .unwrap()
        .clone_with_converter(double)
        .clone_with_converter(add_one);
    assert_eq!(mapping.generate_sql_literal(Some(&DbValue::I64(3))).unwrap(), "8");
}

#[test]
fn test_oracle_ceiling() {
    assert_eq!(oracle_raw(None).max_specific_size(), ORACLE_MAX_BINARY_SIZE);
    assert_eq!(oracle_raw(Some(50)).max_specific_size(), 50);
    assert_eq!(oracle_raw(Some(9000)).max_specific_size(), 8000);
}

#[test]
fn test_oracle_parameter_clamp() {
    let mapping = oracle_raw(Some(50));
    let command = RelationalCommand::new("INSERT INTO blobs VALUES (:p0)");

    let small = DbValue::Bytes(vec![0; 30]);
    let parameter = mapping.create_parameter(&command, ":p0", Some(&small), None).unwrap();
    assert_eq!(parameter.size, Some(50));

    let absent = mapping.create_parameter(&command, ":p0", None, Some(true)).unwrap();
    assert_eq!(absent.size, Some(50));
    assert_eq!(absent.is_nullable, Some(true));

    // Oversized values keep whatever size was already there
    let mut large = DbParameter {
        name: ":p0".into(),
        value: Some(DbValue::Bytes(vec![0; 80])),
        size: Some(120),
        ..DbParameter::default()
    };
    mapping.configure_parameter(&mut large);
    assert_eq!(large.size, Some(120));

    let mut unsized_large = DbParameter {
        value: Some(DbValue::Bytes(vec![0; 80])),
        ..DbParameter::default()
    };
    mapping.configure_parameter(&mut unsized_large);
    assert_eq!(unsized_large.size, None);
}

#[test]
fn test_oracle_literal() {
    let mapping = oracle_raw(Some(16));
    let literal = mapping.generate_sql_literal(Some(&DbValue::Bytes(vec![0x0A, 0xFF]))).unwrap();
    assert_eq!(literal, "'0AFF'");
    assert_eq!(mapping.generate_sql_literal(Some(&DbValue::Bytes(Vec::new()))).unwrap(), "''");
}

// Treats every text value as equal to every other
#[derive(Debug)]
struct AnyTextComparer;

impl ValueComparer for AnyTextComparer {
    fn equals(&self, left: Option<&DbValue>, right: Option<&DbValue>) -> bool {
        match (left, right) {
            (Some(DbValue::Text(_)), Some(DbValue::Text(_))) => true,
            (left, right) => left == right,
        }
    }

    fn hash_value(&self, _value: &DbValue) -> u64 {
        0
    }
}

#[test]
fn test_comparer_defaults_to_structural() {
    let mapping = StringTypeMapping::new("text", true, None, false).unwrap();
    let comparer = mapping.comparer();
    assert!(comparer.equals(Some(&DbValue::from("a")), Some(&DbValue::from("a"))));
    assert!(!comparer.equals(Some(&DbValue::from("a")), Some(&DbValue::from("b"))));
    assert!(comparer.equals(None, None));
    assert_eq!(
        comparer.hash_value(&DbValue::F64(0.0)),
        comparer.hash_value(&DbValue::F64(-0.0))
    );
}

#[test]
fn test_configured_comparer_survives_clones() {
    let core = CoreTypeMappingParameters::new(AppType::String).with_comparer(Arc::new(AnyTextComparer));
    let parameters = RelationalTypeMappingParameters::new(core, "text").unwrap();
    let mapping = StringTypeMapping::from_parameters(parameters)
        .clone_with_store_type_and_size("varchar(10)", Some(10))
        .unwrap();

    let comparer = mapping.comparer();
    assert!(comparer.equals(Some(&DbValue::from("a")), Some(&DbValue::from("b"))));
    assert_eq!(comparer.hash_value(&DbValue::from("a")), 0);
}

#[test]
fn test_reader_accessors() {
    let int = IntegerTypeMapping::new("integer", AppType::I32).unwrap();
    assert_eq!(int.data_reader_accessor(), ReaderAccessor::GetInt32);

    let status = EnumToNumberConverter::new("Status", [("Active", 1), ("Closed", 2)], AppType::I32);
    let enum_mapping = int.clone_with_converter(Arc::new(status));
    assert_eq!(enum_mapping.data_reader_accessor(), ReaderAccessor::GetInt32);

    let point = AppType::Custom("Point".into());
    let parameters =
        RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(point.clone()), "geometry").unwrap();
    let custom = JsonTypeMapping::from_parameters(parameters);
    assert_eq!(custom.data_reader_accessor(), ReaderAccessor::GetFieldValue(point));
}

#[test]
fn test_read_value_converts_back() {
    let status = EnumToNumberConverter::new("Status", [("Active", 1), ("Closed", 2)], AppType::I32);
    let mapping = IntegerTypeMapping::new("integer", AppType::I32)
        .unwrap()
        .clone_with_converter(Arc::new(status));

    let row = ValueRow::new(vec![Some(DbValue::I32(2)), None]);
    assert_eq!(
        mapping.read_value(&row, 0).unwrap(),
        Some(DbValue::Enum(EnumValue::new("Status", "Closed", 2)))
    );
    assert_eq!(mapping.read_value(&row, 1).unwrap(), None);
    assert!(matches!(mapping.read_value(&row, 5), Err(MappingError::InvalidCast { .. })));
}

proptest! {
    #[test]
    fn prop_string_literal_doubles_quotes(text in ".*") {
        let mapping = StringTypeMapping::new("varchar(max)", false, None, false).unwrap();
        let literal = mapping.generate_sql_literal(Some(&DbValue::Text(text.clone()))).unwrap();
        prop_assert_eq!(literal, format!("'{}'", text.replace('\'', "''")));
    }

    #[test]
    fn prop_oracle_literal_is_uppercase_hex(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let literal = oracle_raw(Some(64)).generate_sql_literal(Some(&DbValue::Bytes(bytes.clone()))).unwrap();
        let expected: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
        prop_assert_eq!(literal, format!("'{expected}'"));
    }

    #[test]
    fn prop_oracle_ceiling_within_bounds(size in proptest::option::of(-100i32..20_000)) {
        let ceiling = oracle_raw(size).max_specific_size();
        prop_assert!((0..=ORACLE_MAX_BINARY_SIZE).contains(&ceiling));
        if let Some(size) = size.filter(|s| (0..=ORACLE_MAX_BINARY_SIZE).contains(s)) {
            prop_assert_eq!(ceiling, size);
        }
    }

    #[test]
    fn prop_oracle_clamp_asymmetry(
        ceiling in 1i32..200,
        length in 0usize..400,
        preset in proptest::option::of(1i32..1000),
    ) {
        let mapping = oracle_raw(Some(ceiling));
        let mut parameter = DbParameter {
            value: Some(DbValue::Bytes(vec![7; length])),
            size: preset,
            ..DbParameter::default()
        };
        mapping.configure_parameter(&mut parameter);
        if length <= ceiling as usize {
            prop_assert_eq!(parameter.size, Some(ceiling));
        } else {
            prop_assert_eq!(parameter.size, preset);
        }
    }

    #[test]
    fn prop_integer_literal_matches_display(value in any::<i64>()) {
        let mapping = IntegerTypeMapping::new("bigint", AppType::I64).unwrap();
        prop_assert_eq!(mapping.generate_sql_literal(Some(&DbValue::I64(value))).unwrap(), value.to_string());
    }
}
