//! Files aggregating all components: the manager registry and the wire
//! filter UI dispatch.

use super::{component_file_names, escape, DO_NOT_MODIFY, TAB};
use schemagen::{BodyField, Component};

/// Initial capacity of every component manager.
const INITIAL_MAX_COMPONENTS: u32 = 20;

/// Render `component_managers.h`.
pub fn render_registry(components: &[Component]) -> String {
    let mut out = String::new();

    out.push_str("#pragma once\n\n");
    out.push_str(DO_NOT_MODIFY);
    out.push_str("\n\n");
    out.push_str("#include <unordered_map>\n");
    out.push_str("#include <memory>\n\n");
    out.push_str("#include \"component_manager.h\"\n\n");
    for component in components {
        let (header, _) = component_file_names(&component.name);
        out.push_str(&format!("#include \"{}\"\n", header));
    }
    out.push('\n');
    out.push_str(&format!(
        "#define INITIAL_MAX_COMPONENTS {}\n\n",
        INITIAL_MAX_COMPONENTS
    ));

    out.push_str("struct component_managers {\n");
    out.push_str(&format!("{TAB}component_managers() {{\n"));
    for component in components {
        out.push_str(&format!(
            "{TAB}{TAB}{}_component_man.create_component_instance_data(INITIAL_MAX_COMPONENTS);\n",
            component.name
        ));
    }
    out.push_str(&format!("{TAB}}}\n\n"));

    for component in components {
        out.push_str(&format!(
            "{TAB}{n}_component_manager {n}_component_man{{}};\n",
            n = component.name
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "{TAB}std::unique_ptr<component_stub> get_stub(const char *comp_name, const config_setting_t *config) {{\n"
    ));
    for component in components {
        out.push_str(&format!(
            "{TAB}{TAB}if (strcmp(comp_name, \"{}\") == 0) {{\n",
            component.name
        ));
        out.push_str(&format!(
            "{TAB}{TAB}{TAB}return {}_component_stub::from_config(config);\n",
            component.name
        ));
        out.push_str(&format!("{TAB}{TAB}}}\n"));
    }
    out.push_str(&format!("{TAB}{TAB}assert(false);\n"));
    out.push_str(&format!("{TAB}{TAB}return nullptr;\n"));
    out.push_str(&format!("{TAB}}}\n\n"));

    out.push_str(&format!("{TAB}void destroy_entity_instance(c_entity ce) {{\n"));
    for component in components {
        out.push_str(&format!(
            "{TAB}{TAB}{}_component_man.destroy_entity_instance(ce);\n",
            component.name
        ));
    }
    out.push_str(&format!("{TAB}}}\n"));
    out.push_str("};\n");

    out
}

/// Wire filter fields in wire id order with their owning component.
fn wire_fields(components: &[Component]) -> Vec<(&Component, &BodyField)> {
    let mut fields: Vec<_> = components
        .iter()
        .flat_map(|c| c.wire_fields().map(move |f| (c, f)))
        .collect();
    fields.sort_by_key(|(_, f)| f.wire_id);
    fields
}

/// Render `component_ui_genned.cc`, keyed by wire id.
pub fn render_ui_filters(components: &[Component]) -> String {
    let fields = wire_fields(components);
    let mut out = String::new();

    out.push_str(DO_NOT_MODIFY);
    out.push_str("\n\n");
    out.push_str("#include <vector>\n");
    out.push_str("#include \"../component/component_system_manager.h\"\n\n");
    out.push_str("extern component_system_manager component_system_man;\n\n");

    out.push_str(
        "static void add_filter(std::vector<filter_ui_state> &filters, int field_id, wire_filter_ptr const & w, char const *name) {\n",
    );
    out.push_str(&format!("{TAB}filters.emplace_back();\n"));
    out.push_str(&format!("{TAB}auto & f = filters.back();\n"));
    out.push_str(&format!("{TAB}f.component_name = name;\n"));
    out.push_str(&format!("{TAB}f.field_id = field_id;\n"));
    out.push_str(&format!("{TAB}f.type = w.type;\n\n"));
    out.push_str(&format!("{TAB}if (w.wrapped) {{\n"));
    out.push_str(&format!("{TAB}{TAB}strcpy(f.filter.data(), w.wrapped->c_str());\n"));
    out.push_str(&format!("{TAB}}}\n"));
    out.push_str(&format!("{TAB}else {{\n"));
    out.push_str(&format!("{TAB}{TAB}f.filter[0] = '\\0';\n"));
    out.push_str(&format!("{TAB}}}\n"));
    out.push_str("}\n\n");

    out.push_str("std::vector<filter_ui_state> get_filters(c_entity entity) {\n");
    out.push_str(&format!("{TAB}std::vector<filter_ui_state> filters;\n\n"));
    for component in components {
        let wired: Vec<_> = component.wire_fields().collect();
        if wired.is_empty() {
            continue;
        }
        let n = &component.name;
        out.push_str(&format!(
            "{TAB}auto &{n}_man = component_system_man.managers.{n}_component_man;\n"
        ));
        out.push_str(&format!("{TAB}if ({n}_man.exists(entity)) {{\n"));
        for field in wired {
            let id = field.wire_id.map_or(0, |id| id.0);
            out.push_str(&format!("{TAB}{TAB}{{\n"));
            out.push_str(&format!(
                "{TAB}{TAB}{TAB}auto {n} = {n}_man.get_instance_data(entity);\n"
            ));
            out.push_str(&format!(
                "{TAB}{TAB}{TAB}add_filter(filters, {}, *({n}.{}),\n",
                id, field.name
            ));
            out.push_str(&format!(
                "{TAB}{TAB}{TAB}{TAB}\"{}/{}\");\n",
                escape(&component.display_name),
                field.name
            ));
            out.push_str(&format!("{TAB}{TAB}}}\n"));
        }
        out.push_str(&format!("{TAB}}}\n"));
    }
    out.push_str(&format!("{TAB}return filters;\n"));
    out.push_str("}\n\n");

    out.push_str("void update_filter(c_entity entity, filter_ui_state const& filter) {\n");
    out.push_str(&format!("{TAB}switch (filter.field_id) {{\n"));
    for (component, field) in &fields {
        let n = &component.name;
        let id = field.wire_id.map_or(0, |id| id.0);
        out.push_str(&format!("{TAB}case {}: {{\n", id));
        out.push_str(&format!(
            "{TAB}{TAB}auto &{n}_man = component_system_man.managers.{n}_component_man;\n"
        ));
        out.push_str(&format!("{TAB}{TAB}if ({n}_man.exists(entity)) {{\n"));
        out.push_str(&format!(
            "{TAB}{TAB}{TAB}auto {n} = {n}_man.get_instance_data(entity);\n"
        ));
        out.push_str(&format!("{TAB}{TAB}{TAB}{n}.{}->set(filter);\n", field.name));
        out.push_str(&format!("{TAB}{TAB}}}\n"));
        out.push_str(&format!("{TAB}}} break;\n\n"));
    }
    out.push_str(&format!("{TAB}}}\n"));
    out.push_str("}\n");

    out
}
