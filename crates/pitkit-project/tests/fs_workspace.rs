use std::path::Path;

use pitkit_model::{BuildSystem, CodeType};
use pitkit_project::{BuildUnitStore, FsWorkspace, SourceFolderCatalog};
use pitkit_test_utils::{samples, TempProject};

#[test]
fn maven_project_scans_to_single_unit_with_both_folders() {
    let project = samples::maven_project();
    let workspace = FsWorkspace::discover(project.root()).unwrap();
    let store = BuildUnitStore::new();
    let tree = store.clean_scan(&workspace, &SourceFolderCatalog::new());

    assert_eq!(tree.len(), 1);
    let unit = tree.roots().next().unwrap();
    assert_eq!(unit.build_system, BuildSystem::Maven);
    assert_eq!(unit.descriptor_file_name(), "pom.xml");
    assert_eq!(
        unit.source_folder(CodeType::Production).unwrap().path,
        project.path("src/main/java")
    );
    assert_eq!(
        unit.source_folder(CodeType::Test).unwrap().path,
        project.path("src/test/java")
    );
}

#[test]
fn gradle_modules_nest_under_root_project() {
    let project = samples::gradle_multi_module_project();
    let workspace = FsWorkspace::discover(project.root()).unwrap();
    let tree = BuildUnitStore::new().clean_scan(&workspace, &SourceFolderCatalog::new());

    assert_eq!(tree.len(), 3);
    let root = tree.unit_by_directory(project.root()).unwrap();
    assert!(root.source_folders.is_empty());
    assert_eq!(root.children.len(), 2);

    let lib = tree.unit_by_directory(&project.path("lib")).unwrap();
    assert_eq!(lib.parent, Some(root.id));
    assert_eq!(lib.descriptor_file_name(), "build.gradle.kts");
    assert_eq!(
        lib.source_folder(CodeType::Test).unwrap().path,
        project.path("lib/src/test/kotlin")
    );
    assert_eq!(tree.gradle_project_path(lib.id), ":lib");
}

#[test]
fn generated_annotation_output_is_not_a_source_folder() {
    let project = TempProject::from_fixture(
        r#"
//- /pom.xml
<project/>
//- /src/main/java/
//- /target/generated-sources/annotations/
"#,
    );
    let workspace = FsWorkspace::discover(project.root()).unwrap();
    let tree = BuildUnitStore::new().clean_scan(&workspace, &SourceFolderCatalog::new());

    let unit = tree.roots().next().unwrap();
    assert_eq!(unit.source_folders.len(), 1);
    assert!(tree
        .source_folder_at(&project.path("target/generated-sources/annotations"))
        .is_none());
}

#[test]
fn project_without_descriptors_scans_to_empty_tree() {
    let project = TempProject::from_fixture(
        r#"
//- /src/main/java/A.java
class A {}
"#,
    );
    let workspace = FsWorkspace::discover(project.root()).unwrap();
    let tree = BuildUnitStore::new().clean_scan(&workspace, &SourceFolderCatalog::new());
    assert!(tree.is_empty());
    assert!(tree.unit_by_directory(Path::new("/")).is_none());
}
