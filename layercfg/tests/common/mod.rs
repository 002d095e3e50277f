//! Shared record schema and expected values for the integration tests

#![allow(dead_code)]

use layercfg::Record;

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct InStructNested {
    #[conf(env = "BOOL", flag = "bool", default = false, json = "bool", yaml = "bool", toml = "bool")]
    pub fld_bool: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct InStructParent {
    #[conf(json = "nested", yaml = "nested", toml = "nested")]
    pub fld_nested: InStructNested,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct InStruct {
    #[conf(env = "STR", flag = "str", default = "default-string", json = "str", yaml = "str", toml = "str")]
    pub fld_string: String,
    #[conf(env = "INT", flag = "int", default = -42, json = "int", yaml = "int", toml = "int")]
    pub fld_int: isize,
    #[conf(env = "INT_8", flag = "int-8", default = -8, json = "int_8", yaml = "int_8", toml = "int_8")]
    pub fld_int8: i8,
    #[conf(env = "INT_16", flag = "int-16", default = -16, json = "int_16", yaml = "int_16", toml = "int_16")]
    pub fld_int16: i16,
    #[conf(env = "INT_32", flag = "int-32", default = -32, json = "int_32", yaml = "int_32", toml = "int_32")]
    pub fld_int32: i32,
    #[conf(env = "INT_64", flag = "int-64", default = -64, json = "int_64", yaml = "int_64", toml = "int_64")]
    pub fld_int64: i64,
    #[conf(env = "UINT", flag = "uint", default = 42, json = "uint", yaml = "uint", toml = "uint")]
    pub fld_uint: usize,
    #[conf(env = "UINT_8", flag = "uint-8", default = 8, json = "uint_8", yaml = "uint_8", toml = "uint_8")]
    pub fld_uint8: u8,
    #[conf(env = "UINT_16", flag = "uint-16", default = 16, json = "uint_16", yaml = "uint_16", toml = "uint_16")]
    pub fld_uint16: u16,
    #[conf(env = "UINT_32", flag = "uint-32", default = 32, json = "uint_32", yaml = "uint_32", toml = "uint_32")]
    pub fld_uint32: u32,
    #[conf(env = "UINT_64", flag = "uint-64", default = 64, json = "uint_64", yaml = "uint_64", toml = "uint_64")]
    pub fld_uint64: u64,
    #[conf(env = "FLOAT_32", flag = "float-32", default = 32.32, json = "float_32", yaml = "float_32", toml = "float_32")]
    pub fld_float32: f32,
    #[conf(env = "FLOAT_64", flag = "float-64", default = 64.64, json = "float_64", yaml = "float_64", toml = "float_64")]
    pub fld_float64: f64,
    #[conf(json = "parent", yaml = "parent", toml = "parent")]
    pub fld_parent: InStructParent,
}

/// Build a record whose numbers carry the source's `digit` in front of the
/// bit width (`-342`, `-38`, `332.32` for digit 3), as in the fixture files.
fn stub(text: &str, digit: i64, flag: bool) -> InStruct {
    let wide = |width: i64| digit * 100 + width;
    let byte = digit * 10 + 8;
    InStruct {
        fld_string: text.to_string(),
        fld_int: -wide(42) as isize,
        fld_int8: -byte as i8,
        fld_int16: -wide(16) as i16,
        fld_int32: -wide(32) as i32,
        fld_int64: -wide(64),
        fld_uint: wide(42) as usize,
        fld_uint8: byte as u8,
        fld_uint16: wide(16) as u16,
        fld_uint32: wide(32) as u32,
        fld_uint64: wide(64) as u64,
        fld_float32: format!("{}.32", wide(32)).parse().unwrap(),
        fld_float64: format!("{}.64", wide(64)).parse().unwrap(),
        fld_parent: InStructParent {
            fld_nested: InStructNested { fld_bool: flag },
        },
    }
}

pub fn stub_default() -> InStruct {
    stub("default-string", 0, false)
}

pub fn stub_env() -> InStruct {
    stub("env-string", 1, true)
}

pub fn stub_flag() -> InStruct {
    stub("flag-string", 2, true)
}

pub fn stub_json() -> InStruct {
    stub("json-string", 3, true)
}

pub fn stub_yaml() -> InStruct {
    stub("yaml-string", 4, true)
}

pub fn stub_toml() -> InStruct {
    stub("toml-string", 5, true)
}

pub fn stub_env_file() -> InStruct {
    stub("env-file-string", 6, true)
}

/// Environment table matching [`stub_env`].
pub fn env_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        ("STR", "env-string"),
        ("INT", "-142"),
        ("INT_8", "-18"),
        ("INT_16", "-116"),
        ("INT_32", "-132"),
        ("INT_64", "-164"),
        ("UINT", "142"),
        ("UINT_8", "18"),
        ("UINT_16", "116"),
        ("UINT_32", "132"),
        ("UINT_64", "164"),
        ("FLOAT_32", "132.32"),
        ("FLOAT_64", "164.64"),
        ("BOOL", "true"),
    ]
}

/// Command-line arguments matching [`stub_flag`].
pub fn flag_args() -> Vec<&'static str> {
    vec![
        "--str", "flag-string",
        "--int", "-242",
        "--int-8", "-28",
        "--int-16", "-216",
        "--int-32", "-232",
        "--int-64", "-264",
        "--uint", "242",
        "--uint-8", "28",
        "--uint-16", "216",
        "--uint-32", "232",
        "--uint-64", "264",
        "--float-32", "232.32",
        "--float-64", "264.64",
        "--bool", "true",
    ]
}

pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}
