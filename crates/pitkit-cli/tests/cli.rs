use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn pitkit() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pitkit"))
}

fn write_class(temp: &TempDir, source_root: &str, qualified_name: &str) {
    let (package, simple) = qualified_name
        .rsplit_once('.')
        .unwrap_or(("", qualified_name));
    temp.child(format!(
        "{source_root}/{}.java",
        qualified_name.replace('.', "/")
    ))
    .write_str(&format!("package {package};\n\npublic class {simple} {{\n}}\n"))
    .unwrap();
}

fn maven_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("pom.xml").write_str("<project/>\n").unwrap();
    write_class(&temp, "src/main/java", "com.myproject.package1.ClassA");
    write_class(&temp, "src/main/java", "com.myproject.package3.ClassD");
    write_class(&temp, "src/test/java", "com.myproject.package1.ClassATest");
    temp
}

fn gradle_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("settings.gradle.kts")
        .write_str("include(\"app\", \"lib\")\n")
        .unwrap();
    temp.child("build.gradle.kts").write_str("").unwrap();
    temp.child("app/build.gradle.kts").write_str("").unwrap();
    temp.child("lib/build.gradle.kts").write_str("").unwrap();
    write_class(&temp, "app/src/main/java", "com.example.app.App");
    write_class(&temp, "app/src/test/java", "com.example.app.AppTest");
    write_class(&temp, "lib/src/main/java", "com.example.lib.Lib");
    temp
}

#[test]
fn help_mentions_core_commands() {
    pitkit().arg("--help").assert().success().stdout(
        predicate::str::contains("units").and(predicate::str::contains("resolve")),
    );
}

#[test]
fn units_json_lists_maven_unit_and_folders() {
    let temp = maven_project();
    let output = pitkit()
        .arg("units")
        .arg("--root")
        .arg(temp.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let units = v["units"].as_array().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["build_system"], "maven");
    assert!(units[0]["parent"].is_null());
    let code_types: Vec<&str> = units[0]["source_folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|folder| folder["code_type"].as_str().unwrap())
        .collect();
    assert_eq!(code_types, vec!["production", "test"]);
}

#[test]
fn units_prints_gradle_hierarchy() {
    let temp = gradle_project();
    pitkit()
        .arg("units")
        .arg("--root")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("  app [Gradle]")
                .and(predicate::str::contains("  lib [Gradle]"))
                .and(predicate::str::contains("- src/main/java (production)")),
        );
}

#[test]
fn resolve_class_composes_maven_command() {
    let temp = maven_project();
    pitkit()
        .arg("resolve")
        .arg(temp.child("src/main/java/com/myproject/package1/ClassA.java").path())
        .arg("--root")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("targetClasses: com.myproject.package1.ClassA\n")
                .and(predicate::str::contains(
                    "targetTests: com.myproject.package1.ClassATest\n",
                ))
                .and(predicate::str::contains(
                    "command: mvn pitest:mutationCoverage \
                     -DtargetClasses=com.myproject.package1.ClassA \
                     -DtargetTests=com.myproject.package1.ClassATest",
                ))
                .and(predicate::str::contains("warning:").not()),
        );
}

#[test]
fn resolve_json_reports_missing_counterparts() {
    let temp = maven_project();
    let output = pitkit()
        .arg("resolve")
        .arg(temp.child("src/main/java/com/myproject/package3/ClassD.java").path())
        .arg("--root")
        .arg(temp.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["target_classes"], "com.myproject.package3.ClassD");
    assert_eq!(v["target_tests"], "");
    assert_eq!(
        v["errors"],
        serde_json::json!(["Class com.myproject.package3.ClassD not found in test source folder"])
    );
    assert_eq!(
        v["command"],
        "mvn pitest:mutationCoverage -DtargetClasses=com.myproject.package3.ClassD"
    );
}

#[test]
fn resolve_gradle_child_qualifies_task() {
    let temp = gradle_project();
    pitkit()
        .arg("resolve")
        .arg(temp.child("app/src/main/java/com/example/app/App.java").path())
        .arg("--root")
        .arg(temp.path())
        .arg("--pre")
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "command: gradle :app:clean :app:pitest \
             -Ppitest.targetClasses=com.example.app.App \
             -Ppitest.targetTests=com.example.app.AppTest",
        ));
}

#[test]
fn resolve_descriptor_only_selection_exits_with_structural_error() {
    let temp = maven_project();
    pitkit()
        .arg("resolve")
        .arg(temp.child("pom.xml").path())
        .arg("--root")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing selected"));
}

#[test]
fn resolve_without_build_descriptor_exits_with_structural_error() {
    let temp = TempDir::new().unwrap();
    write_class(&temp, "src/main/java", "com.acme.A");
    pitkit()
        .arg("resolve")
        .arg(temp.child("src/main/java/com/acme/A.java").path())
        .arg("--root")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no build system detected"));
}

#[test]
fn resolve_missing_path_fails() {
    let temp = maven_project();
    pitkit()
        .arg("resolve")
        .arg(temp.child("src/main/java/Nope.java").path())
        .arg("--root")
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to resolve"));
}

#[test]
fn saved_actions_are_reused_by_later_runs() {
    let temp = maven_project();
    let class = temp.child("src/main/java/com/myproject/package1/ClassA.java");

    pitkit()
        .arg("resolve")
        .arg(class.path())
        .arg("--root")
        .arg(temp.path())
        .arg("--pre")
        .arg("clean   install")
        .arg("--post")
        .arg("site")
        .arg("--save-actions")
        .assert()
        .success();
    temp.child(".pitkit/actions.toml")
        .assert(predicate::str::contains("pre_actions = \"clean   install\""));

    pitkit()
        .arg("resolve")
        .arg(class.path())
        .arg("--root")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "command: mvn clean install pitest:mutationCoverage site ",
        ));
}
