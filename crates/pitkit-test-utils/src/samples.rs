//! Canned projects.

use crate::{java_class, kotlin_class, TempProject};

/// Single-module Maven project.
///
/// ```text
/// src/main/java/com/myproject/package1/ClassA.java
/// src/main/java/com/myproject/package2/ClassB.java
/// src/main/java/com/myproject/package3/ClassD.java   (no test)
/// src/test/java/com/myproject/package1/ClassATest.java
/// src/test/java/com/myproject/package2/ClassBTest.java
/// src/test/java/com/myproject/package9/ClassATest.java
/// ```
pub fn maven_project() -> TempProject {
    let project = TempProject::new();
    project.write("pom.xml", MAVEN_POM);
    for class in [
        "com.myproject.package1.ClassA",
        "com.myproject.package2.ClassB",
        "com.myproject.package3.ClassD",
    ] {
        project.write(&java_path("src/main/java", class), &java_class(class));
    }
    for class in [
        "com.myproject.package1.ClassATest",
        "com.myproject.package2.ClassBTest",
        "com.myproject.package9.ClassATest",
    ] {
        project.write(&java_path("src/test/java", class), &java_class(class));
    }
    project
}

/// Gradle build with a root project and two child modules.
///
/// `app` is Java, `lib` is Kotlin; the root project has no sources.
pub fn gradle_multi_module_project() -> TempProject {
    let project = TempProject::new();
    project.write(
        "settings.gradle.kts",
        "rootProject.name = \"gradle-multi-module\"\ninclude(\"app\", \"lib\")\n",
    );
    project.write("build.gradle.kts", GRADLE_ROOT_BUILD);
    project.write("app/build.gradle.kts", GRADLE_MODULE_BUILD);
    project.write("lib/build.gradle.kts", GRADLE_MODULE_BUILD);

    project.write(
        &java_path("app/src/main/java", "com.example.app.App"),
        &java_class("com.example.app.App"),
    );
    project.write(
        &java_path("app/src/test/java", "com.example.app.AppTest"),
        &java_class("com.example.app.AppTest"),
    );
    project.write(
        &kotlin_path("lib/src/main/kotlin", "com.example.lib.Calculator"),
        &kotlin_class("com.example.lib.Calculator"),
    );
    project.write(
        &kotlin_path("lib/src/test/kotlin", "com.example.lib.CalculatorTest"),
        &kotlin_class("com.example.lib.CalculatorTest"),
    );
    project
}

/// Relative path of a Java source file inside `source_root`.
pub fn java_path(source_root: &str, qualified_name: &str) -> String {
    format!("{source_root}/{}.java", qualified_name.replace('.', "/"))
}

pub fn kotlin_path(source_root: &str, qualified_name: &str) -> String {
    format!("{source_root}/{}.kt", qualified_name.replace('.', "/"))
}

const MAVEN_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.myproject</groupId>
  <artifactId>sample-maven</artifactId>
  <version>1.0-SNAPSHOT</version>
</project>
"#;

const GRADLE_ROOT_BUILD: &str = r#"plugins {
    id("info.solidsoft.pitest") version "1.15.0" apply false
}
"#;

const GRADLE_MODULE_BUILD: &str = r#"plugins {
    id("java")
    id("info.solidsoft.pitest")
}
"#;
