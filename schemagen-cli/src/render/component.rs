//! Per-component header and source.

use super::{DO_NOT_MODIFY, TAB};
use schemagen::component::FIRST_PREDECESSOR;
use schemagen::{BodyField, Component};

/// Render `<name>_component.h`.
pub fn render_component_header(component: &Component) -> String {
    let name = &component.name;
    let mut out = String::new();

    out.push_str("#pragma once\n\n");
    out.push_str(DO_NOT_MODIFY);
    out.push_str("\n\n");
    out.push_str("#include \"component_manager.h\"\n");
    if component.wire_fields().next().is_some() {
        out.push_str("#include \"wire_filter.h\"\n");
    }
    out.push('\n');
    out.push_str(&format!("// {} component\n\n", component.display_name));

    out.push_str(&format!("struct {}_component_manager : component_manager {{\n", name));
    out.push_str(&format!("{TAB}struct instance_data {{\n"));
    out.push_str(&format!("{TAB}{TAB}c_entity *entity;\n"));
    for field in &component.body_fields {
        out.push_str(&format!("{TAB}{TAB}{} *{};\n", field.ty, field.name));
    }
    out.push_str(&format!("{TAB}}} instance_pool;\n\n"));

    out.push_str(&format!("{TAB}void create_component_instance_data(unsigned count) override;\n\n"));
    out.push_str(&format!("{TAB}void destroy_instance(instance i) override;\n\n"));
    out.push_str(&format!("{TAB}void entity(c_entity const &e) override;\n"));

    for field in &component.body_fields {
        out.push('\n');
        out.push_str(&format!("{TAB}{} & {}(c_entity const &e) {{\n", field.ty, field.name));
        out.push_str(&format!("{TAB}{TAB}auto inst = lookup(e);\n\n"));
        out.push_str(&format!("{TAB}{TAB}return instance_pool.{}[inst.index];\n", field.name));
        out.push_str(&format!("{TAB}}}\n"));
    }
    out.push_str("};\n\n");

    out.push_str(&format!("struct {}_component_stub : component_stub {{\n", name));
    out.push_str(&format!("{TAB}{}_component_stub() = default;\n\n", name));
    for stub in &component.stub_fields {
        out.push_str(&format!("{TAB}{} {}{{}};\n\n", stub.outer_type, stub.name));
    }
    out.push_str(&format!("{TAB}void\n"));
    out.push_str(&format!("{TAB}assign_component_to_entity(c_entity entity) override;\n\n"));
    out.push_str(&format!("{TAB}std::vector<std::string> get_dependencies() override;\n\n"));
    out.push_str(&format!(
        "{TAB}static std::unique_ptr<component_stub> from_config(config_setting_t const *config);\n"
    ));
    out.push_str("};\n");

    out
}

/// Render `<name>_component.cc`.
pub fn render_component_source(component: &Component) -> String {
    let name = &component.name;
    let mut out = String::new();

    out.push_str(DO_NOT_MODIFY);
    out.push_str("\n\n");
    out.push_str("#include <algorithm>\n");
    out.push_str("#include <string.h>\n");
    out.push_str("#include <memory>\n\n");
    out.push_str("#include \"../memory.h\"\n");
    out.push_str(&format!("#include \"{}_component.h\"\n", name));
    out.push_str("#include \"component_system_manager.h\"\n\n");
    out.push_str("extern component_system_manager component_system_man;\n\n");

    render_create_instance_data(&mut out, component);
    render_destroy_instance(&mut out, component);
    render_entity(&mut out, component);
    render_assign(&mut out, component);
    render_from_config(&mut out, component);
    render_dependencies(&mut out, component);

    out
}

fn render_create_instance_data(out: &mut String, component: &Component) {
    let name = &component.name;

    out.push_str("void\n");
    out.push_str(&format!(
        "{}_component_manager::create_component_instance_data(unsigned count) {{\n",
        name
    ));
    out.push_str(&format!("{TAB}if (count <= buffer.allocated)\n"));
    out.push_str(&format!("{TAB}{TAB}return;\n\n"));
    out.push_str(&format!("{TAB}component_buffer new_buffer{{}};\n"));
    out.push_str(&format!("{TAB}instance_data new_pool{{}};\n\n"));

    out.push_str(&format!("{TAB}size_t size = sizeof(c_entity) * count;\n"));
    for field in &component.body_fields {
        out.push_str(&format!(
            "{TAB}size = sizeof({ty}) * count + align_size<{ty}>(size);\n",
            ty = field.ty
        ));
    }
    out.push_str(&format!(
        "{TAB}size += 16;   // for worst-case misalignment of initial ptr\n\n"
    ));

    out.push_str(&format!("{TAB}new_buffer.buffer = malloc(size);\n"));
    out.push_str(&format!("{TAB}new_buffer.num = buffer.num;\n"));
    out.push_str(&format!("{TAB}new_buffer.allocated = count;\n"));
    out.push_str(&format!("{TAB}memset(new_buffer.buffer, 0, size);\n\n"));

    out.push_str(&format!(
        "{TAB}new_pool.{FIRST_PREDECESSOR} = align_ptr((c_entity *)new_buffer.buffer);\n"
    ));
    for field in &component.body_fields {
        out.push_str(&format!(
            "{TAB}new_pool.{} = align_ptr(({} *)(new_pool.{} + count));\n",
            field.name, field.ty, field.predecessor
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "{TAB}memcpy(new_pool.entity, instance_pool.entity, buffer.num * sizeof(c_entity));\n"
    ));
    for field in &component.body_fields {
        out.push_str(&format!(
            "{TAB}memcpy(new_pool.{n}, instance_pool.{n}, buffer.num * sizeof({ty}));\n",
            n = field.name,
            ty = field.ty
        ));
    }
    out.push('\n');

    out.push_str(&format!("{TAB}free(buffer.buffer);\n"));
    out.push_str(&format!("{TAB}buffer = new_buffer;\n\n"));
    out.push_str(&format!("{TAB}instance_pool = new_pool;\n"));
    out.push_str("}\n\n");
}

fn render_destroy_instance(out: &mut String, component: &Component) {
    out.push_str("void\n");
    out.push_str(&format!(
        "{}_component_manager::destroy_instance(instance i) {{\n",
        component.name
    ));
    out.push_str(&format!("{TAB}auto last_index = buffer.num - 1;\n"));
    out.push_str(&format!("{TAB}auto last_entity = instance_pool.entity[last_index];\n"));
    out.push_str(&format!("{TAB}auto current_entity = instance_pool.entity[i.index];\n\n"));
    out.push_str(&format!(
        "{TAB}instance_pool.entity[i.index] = instance_pool.entity[last_index];\n"
    ));
    for field in &component.body_fields {
        out.push_str(&format!(
            "{TAB}instance_pool.{n}[i.index] = instance_pool.{n}[last_index];\n",
            n = field.name
        ));
    }
    out.push('\n');
    out.push_str(&format!("{TAB}entity_instance_map[last_entity] = i.index;\n"));
    out.push_str(&format!("{TAB}entity_instance_map.erase(current_entity);\n\n"));
    out.push_str(&format!("{TAB}--buffer.num;\n"));
    out.push_str("}\n\n");
}

fn render_entity(out: &mut String, component: &Component) {
    let name = &component.name;

    out.push_str("void\n");
    out.push_str(&format!("{}_component_manager::entity(c_entity const &e) {{\n", name));
    out.push_str(&format!("{TAB}if (buffer.num >= buffer.allocated) {{\n"));
    out.push_str(&format!(
        "{TAB}{TAB}printf(\"Increasing size of {} buffer. Please adjust\\n\");\n",
        name
    ));
    out.push_str(&format!(
        "{TAB}{TAB}create_component_instance_data(std::max(1u, buffer.allocated) * 2);\n"
    ));
    out.push_str(&format!("{TAB}}}\n\n"));
    out.push_str(&format!("{TAB}auto inst = lookup(e);\n\n"));
    out.push_str(&format!("{TAB}instance_pool.entity[inst.index] = e;\n"));
    out.push_str("}\n\n");
}

/// Initializer for a body field: the linked stub's value, or the default.
fn initial_value(component: &Component, field: &BodyField) -> String {
    match component.linked_stub(field) {
        Some(stub) => format!("{}{}{}", stub.prefix, stub.name, stub.extra),
        None => field.default_value.clone(),
    }
}

fn render_assign(out: &mut String, component: &Component) {
    let name = &component.name;

    out.push_str("void\n");
    out.push_str(&format!(
        "{}_component_stub::assign_component_to_entity(c_entity entity) {{\n",
        name
    ));
    out.push_str(&format!(
        "{TAB}auto &man = component_system_man.managers.{}_component_man;\n\n",
        name
    ));
    out.push_str(&format!("{TAB}man.assign_entity(entity);\n\n"));
    out.push_str(&format!("{TAB}auto data = man.get_instance_data(entity);\n"));
    for field in &component.body_fields {
        out.push('\n');
        out.push_str(&format!(
            "{TAB}*data.{} = {};\n",
            field.name,
            initial_value(component, field)
        ));
    }
    out.push_str("}\n\n");
}

fn render_from_config(out: &mut String, component: &Component) {
    let name = &component.name;

    out.push_str(&format!(
        "std::unique_ptr<component_stub> {}_component_stub::from_config(config_setting_t const *config) {{\n",
        name
    ));
    out.push_str(&format!(
        "{TAB}auto {n}_stub = std::make_unique<{n}_component_stub>();\n\n",
        n = name
    ));
    for stub in &component.stub_fields {
        out.push_str(&format!(
            "{TAB}{}_stub->{} = load_value_from_config<{}>(config, \"{}\");\n\n",
            name, stub.name, stub.ty, stub.name
        ));
    }
    out.push_str(&format!("{TAB}return std::move({}_stub);\n", name));
    out.push_str("}\n\n");
}

fn render_dependencies(out: &mut String, component: &Component) {
    out.push_str(&format!(
        "std::vector<std::string> {}_component_stub::get_dependencies() {{\n",
        component.name
    ));
    out.push_str(&format!("{TAB}return {{\n"));
    if !component.dependencies.is_empty() {
        let deps: Vec<String> = component
            .dependencies
            .iter()
            .map(|d| format!("\"{}\", ", d))
            .collect();
        out.push_str(&format!("{TAB}{TAB}{}\n", deps.concat()));
    }
    out.push_str(&format!("{TAB}}};\n"));
    out.push_str("}\n");
}
