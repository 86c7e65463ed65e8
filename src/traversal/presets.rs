//! Ready-made search configurations for the common structural queries.

use super::filter::{
    and, or, keep_application_modules, keep_directories, keep_module_groups, keep_neighbourhood,
    keep_name, keep_ownership, keep_parenthood, keep_process_variables, keep_root, keep_variable_groups,
};
use super::{SearchConfig, SearchType};

fn adjacent_out() -> SearchConfig {
    SearchConfig::new(SearchType::AdjacentOut)
}

fn adjacent_in() -> SearchConfig {
    SearchConfig::new(SearchType::AdjacentIn)
}

pub fn owned_module_groups() -> SearchConfig {
    adjacent_out().edges(keep_ownership()).vertices(keep_module_groups())
}

pub fn owned_application_modules() -> SearchConfig {
    adjacent_out().edges(keep_ownership()).vertices(keep_application_modules())
}

pub fn owned_variable_groups() -> SearchConfig {
    adjacent_out().edges(keep_ownership()).vertices(keep_variable_groups())
}

pub fn owned_variables() -> SearchConfig {
    adjacent_out().edges(keep_ownership()).vertices(keep_process_variables())
}

pub fn child_directories() -> SearchConfig {
    adjacent_out().edges(keep_parenthood()).vertices(keep_directories())
}

pub fn child_variables() -> SearchConfig {
    adjacent_out().edges(keep_parenthood()).vertices(keep_process_variables())
}

/// Directories and variables below a directory.
pub fn children() -> SearchConfig {
    adjacent_out().edges(keep_parenthood())
}

pub fn get_owner() -> SearchConfig {
    adjacent_in().edges(keep_ownership())
}

pub fn get_parent() -> SearchConfig {
    adjacent_in().edges(keep_parenthood())
}

/// The directory holding a module's namespace. The root is its own.
pub fn get_neighbour_directory() -> SearchConfig {
    adjacent_out()
        .edges(keep_neighbourhood())
        .vertices(or(keep_directories(), keep_root()))
        .first_hit()
}

/// Modules whose namespace is this directory.
pub fn neighbour_modules() -> SearchConfig {
    adjacent_in().edges(keep_neighbourhood())
}

/// Child directory called `name`.
pub fn child_directory_named(name: &str) -> SearchConfig {
    adjacent_out()
        .edges(keep_parenthood())
        .vertices(and(keep_directories(), keep_name(name)))
        .first_hit()
}

/// Child process variable called `name`.
pub fn child_variable_named(name: &str) -> SearchConfig {
    adjacent_out()
        .edges(keep_parenthood())
        .vertices(and(keep_process_variables(), keep_name(name)))
        .first_hit()
}
