/// Starter `.rewire.toml` written by `rewire --init`.
pub fn init_template() -> &'static str {
	r#"# rewire pipeline file
#
# Stages run in order. `enabled = false` drops a stage; `when` decides at
# run time whether it applies.
root = true

# Skip ~/.rewire.toml when this variable is truthy
# root-config-lookup-disable-env-var = "CI"

[[stages]]
transform = "add-decorators-legacy"

[[stages]]
transform = "add-bundle-visualizer"
behind-flag = true

[[stages]]
transform = "add-webpack-alias"
alias = { "@" = "src" }
enabled = false

# [[stages]]
# transform = "add-less-loader"
# options = { javascriptEnabled = true }
# when = { env-not-equals = { var = "CI", value = "true" } }

[[dev-server]]
transform = "watch-all"
"#
}
