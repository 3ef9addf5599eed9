/// Starter `.relines.toml` written by `relines --init`.
pub fn generate_init_template() -> &'static str {
	r#"# relines configuration
#
# Stop looking for .relines.toml files in parent directories.
root = true

# Never read ~/.relines.toml for this tree.
# no-user-config = true

[settings]
# Write _<YYYYMMDDHHMMSS><name> before literal substitutions.
backup = true
# "prefix" -> _20240101120000app.conf, "suffix" -> app.conf_20240101120000
backup-placement = "prefix"
# Error on start > end instead of treating the column edit as a no-match.
strict-columns = false
# Refuse to touch files that are not valid UTF-8.
require-utf8 = false
# Append a newline to column/key replacement lines that lack one.
terminate-replacements = false

# Replace every occurrence of a substring.
[[edits]]
name = "api-host"
path = "app.conf"
kind = "literal"
original = "localhost"
replacement = "api.internal"

# Replace whole lines whose columns [start, end) equal the prefix.
[[edits]]
name = "header"
path = "records.dat"
kind = "column-prefix"
prefix = "HDR"
start = 0
end = 3
replacement-line = "HDR 2024-01-01\n"

# Replace lines starting with the key by key + suffix.
[[edits]]
name = "port"
path = ".env"
kind = "key-prefix"
key = "PORT="
suffix = "8080\n"
"#
}
