const JAVA_HOME_KEY: &str = "java.home";

/// Value of the `java.home` entry in an `ambari.properties` file, with all
/// whitespace stripped. `None` when the key is absent or empty.
pub fn extract_java_home(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let rest = line.strip_prefix(JAVA_HOME_KEY)?;
        let rest = rest.trim_start();
        let value = rest
            .strip_prefix('=')
            .or_else(|| rest.strip_prefix(':'))?;
        let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        (!value.is_empty()).then_some(value)
    })
}
