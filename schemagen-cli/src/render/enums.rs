//! `enums.h` / `enums.cc`: typed enums plus libconfig glue.

use super::{escape, DO_NOT_MODIFY, TAB};
use schemagen::enum_spec::{INVALID_SYMBOL, INVALID_VALUE};
use schemagen::EnumSpec;

const SEPARATOR: &str = "// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-";

/// Render `enums.h`.
pub fn render_enums_header(enums: &[EnumSpec]) -> String {
    let mut out = String::new();

    out.push_str("#pragma once\n\n");
    out.push_str("#include <libconfig.h>\n");
    out.push_str("#include \"../libconfig_shim.h\"\n\n");
    out.push_str(DO_NOT_MODIFY);
    out.push_str("\n\n\n");
    out.push_str("template<typename T>\n");
    out.push_str(&format!("{TAB}T get_enum(const char *e);\n\n"));

    for spec in enums {
        let e = &spec.name;

        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&format!("enum class {}\n", e));
        out.push_str("{\n");
        for (symbol, entry) in &spec.symbols {
            out.push_str(&format!("{TAB}{} = {},\n", symbol, entry.value));
        }
        out.push_str(&format!("{TAB}{} = {},\n", INVALID_SYMBOL, INVALID_VALUE));
        out.push_str("};\n\n");
        out.push_str(&format!("const char* get_enum_description({} value);\n\n", e));
        out.push_str(&format!("const char* get_enum_string({} value);\n\n", e));
        out.push_str(&format!("template<> {e} get_enum<{e}>(const char *e);\n\n"));
        out.push_str(&format!(
            "{e} config_setting_get_{e}(const config_setting_t *setting);\n\n"
        ));
        out.push_str(&format!(
            "int config_setting_set_{e}(config_setting_t *setting, {e} value);\n\n"
        ));
        out.push_str(&format!(
            "int config_setting_lookup_{e}(const config_setting_t *setting, const char *name, {e} *value);\n"
        ));
    }

    out
}

/// Render `enums.cc`.
pub fn render_enums_source(enums: &[EnumSpec]) -> String {
    let mut out = String::new();

    out.push_str(DO_NOT_MODIFY);
    out.push_str("\n\n");
    out.push_str("#include \"enums.h\"\n\n");
    out.push_str("#include <cassert>\n");
    out.push_str("#include <cstring>\n");

    for spec in enums {
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
        render_switch(&mut out, spec, "get_enum_description", |_, s| s.description.as_str());
        out.push('\n');
        render_switch(&mut out, spec, "get_enum_string", |name, _| name);
        out.push('\n');
        render_get_enum(&mut out, spec);
        out.push('\n');
        render_config_glue(&mut out, spec);
    }

    out
}

/// A `switch` over every symbol returning a string; unknown values assert.
fn render_switch(
    out: &mut String,
    spec: &EnumSpec,
    function: &str,
    text: impl for<'a> Fn(&'a str, &'a schemagen::EnumSymbol) -> &'a str,
) {
    let e = &spec.name;

    out.push_str(&format!("const char* {}({} value) {{\n", function, e));
    out.push_str(&format!("{TAB}switch(value)\n"));
    out.push_str(&format!("{TAB}{{\n"));
    for (symbol, entry) in &spec.symbols {
        out.push_str(&format!("{TAB}case {}::{}:\n", e, symbol));
        out.push_str(&format!(
            "{TAB}{TAB}return \"{}\";\n",
            escape(text(symbol, entry))
        ));
    }
    out.push_str(&format!("{TAB}default:\n"));
    out.push_str(&format!("{TAB}{TAB}assert(false);\n"));
    out.push_str(&format!("{TAB}{TAB}return nullptr;\n"));
    out.push_str(&format!("{TAB}}}\n"));
    out.push_str("}\n");
}

fn render_get_enum(out: &mut String, spec: &EnumSpec) {
    let e = &spec.name;

    out.push_str(&format!("template<> {e} get_enum<{e}>(const char *e) {{\n"));
    out.push_str(&format!("{TAB}auto val{{{}::{}}};\n", e, INVALID_SYMBOL));
    for symbol in spec.symbols.keys() {
        out.push_str(&format!("{TAB}if (!strcmp(e, \"{}\")) {{\n", symbol));
        out.push_str(&format!("{TAB}{TAB}val = {}::{};\n", e, symbol));
        out.push_str(&format!("{TAB}}}\n"));
    }
    out.push_str(&format!("{TAB}assert(val != {}::{});\n", e, INVALID_SYMBOL));
    out.push_str(&format!("{TAB}return val;\n"));
    out.push_str("}\n");
}

fn render_config_glue(out: &mut String, spec: &EnumSpec) {
    let e = &spec.name;

    out.push_str(&format!(
        "{e} config_setting_get_{e}(const config_setting_t *setting) {{\n"
    ));
    out.push_str(&format!(
        "{TAB}const char *str = config_setting_get_string(setting);\n"
    ));
    out.push_str(&format!("{TAB}return get_enum<{e}>(str);\n"));
    out.push_str("}\n\n");

    out.push_str(&format!(
        "int config_setting_set_{e}(config_setting_t *setting, {e} value) {{\n"
    ));
    out.push_str(&format!("{TAB}auto str = get_enum_string(value);\n"));
    out.push_str(&format!("{TAB}return (config_setting_set_string(setting, str));\n"));
    out.push_str("}\n\n");

    out.push_str(&format!(
        "int config_setting_lookup_{e}(const config_setting_t *setting, const char *name, {e} *value) {{\n"
    ));
    out.push_str(&format!(
        "{TAB}auto *member = config_setting_get_member(setting, name);\n"
    ));
    out.push_str(&format!("{TAB}if(!member) {{\n"));
    out.push_str(&format!("{TAB}{TAB}return CONFIG_FALSE;\n"));
    out.push_str(&format!("{TAB}}}\n\n"));
    out.push_str(&format!(
        "{TAB}*value = ({e})config_setting_get_{e}(member);\n"
    ));
    out.push_str(&format!("{TAB}return CONFIG_TRUE;\n"));
    out.push_str("}\n");
}
