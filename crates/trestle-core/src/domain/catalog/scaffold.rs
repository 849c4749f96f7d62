//! The scaffold pipeline applied after the base generator.

use crate::domain::{
    entities::{
        configuration::Configuration,
        pipeline::Pipeline,
        step::{Branch, CommandSpec, Selection, Step, SubAction, TextEdit},
    },
    error::DomainError,
};

pub const SCAFFOLD_PIPELINE: &str = "scaffold";

const WEBPACKER_GEM: &str = "\ngem \"webpacker\"\n";

const DEPLOY_GEMS: &str = "\ngroup :staging, :production do
  gem \"rack-timeout\"
  gem \"rails_stdout_logging\"
end
";

// ── Predicates ───────────────────────────────────────────────────────────────

fn vcs_enabled(c: &Configuration) -> bool {
    !c.skip_vcs()
}

fn deploy_enabled(c: &Configuration) -> bool {
    !c.skip_deploy_provisioning()
}

fn code_host_requested(c: &Configuration) -> bool {
    !c.skip_vcs() && c.code_host_repo().is_some()
}

fn origin_requested(c: &Configuration) -> bool {
    !c.skip_vcs() && c.git_remote_origin().is_some()
}

fn webpack_enabled(c: &Configuration) -> bool {
    c.webpack()
}

fn rspec_enabled(c: &Configuration) -> bool {
    c.skip_legacy_test_framework()
}

fn database_selection(c: &Configuration) -> Option<Selection> {
    Some(Selection::of(c.database()))
}

fn css_selection(c: &Configuration) -> Option<Selection> {
    c.css_framework().map(Selection::of)
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

/// Steps in execution order.
pub fn scaffold_pipeline() -> Result<Pipeline, DomainError> {
    Pipeline::builder(SCAFFOLD_PIPELINE)
        .register(Step::actions(
            "copy_project_markdown_files",
            vec![
                SubAction::render("README.md", "README.md"),
                SubAction::render(
                    "github/PULL_REQUEST_TEMPLATE.md",
                    ".github/PULL_REQUEST_TEMPLATE.md",
                ),
            ],
        ))
        .register(
            Step::group(
                "customize_gemfile",
                vec![
                    Step::actions(
                        "replace_gemfile",
                        vec![
                            SubAction::render("Gemfile", "Gemfile"),
                            SubAction::render("ruby-version", ".ruby-version"),
                        ],
                    ),
                    Step::actions(
                        "add_webpacker",
                        vec![SubAction::edit("Gemfile", TextEdit::Append(WEBPACKER_GEM))],
                    )
                    .when("webpack", webpack_enabled),
                    Step::actions(
                        "add_deploy_gems",
                        vec![SubAction::edit("Gemfile", TextEdit::Append(DEPLOY_GEMS))],
                    )
                    .when("!skip_deploy_provisioning", deploy_enabled),
                    Step::actions(
                        "bundle_install",
                        vec![SubAction::command(CommandSpec::new("bundle").args(&["install"]))],
                    ),
                    Step::actions(
                        "install_webpacker",
                        vec![SubAction::command(
                            CommandSpec::new("bin/rails").args(&["webpacker:install"]),
                        )],
                    )
                    .when("webpack", webpack_enabled),
                ],
            )
            .announce("Customizing the Gemfile"),
        )
        .register(
            Step::actions(
                "setup_development_environment",
                vec![
                    SubAction::edit(
                        "config/environments/development.rb",
                        TextEdit::Replace {
                            find: "config.action_mailer.raise_delivery_errors = false",
                            replace: "config.action_mailer.raise_delivery_errors = true",
                        },
                    ),
                    SubAction::render_executable("bin/setup", "bin/setup"),
                    SubAction::render("rubocop.yml", ".rubocop.yml"),
                ],
            )
            .announce("Setting up the development environment"),
        )
        .register(
            Step::actions(
                "setup_test_environment",
                vec![
                    SubAction::render("rspec", ".rspec"),
                    SubAction::render("spec/rails_helper.rb", "spec/rails_helper.rb"),
                    SubAction::render("spec/spec_helper.rb", "spec/spec_helper.rb"),
                    SubAction::render(
                        "spec/support/database_cleaner.rb",
                        "spec/support/database_cleaner.rb",
                    ),
                ],
            )
            .announce("Setting up the test environment")
            .when("skip_legacy_test_framework", rspec_enabled),
        )
        .register(
            Step::actions(
                "setup_production_environment",
                vec![
                    SubAction::render("config/smtp.rb", "config/smtp.rb"),
                    SubAction::edit(
                        "config/environments/production.rb",
                        TextEdit::Prepend("require Rails.root.join(\"config/smtp\")\n"),
                    ),
                    SubAction::edit(
                        "config/environments/production.rb",
                        TextEdit::Replace {
                            find: "config.action_mailer.perform_caching = false",
                            replace: "config.action_mailer.perform_caching = false\n  \
                                      config.action_mailer.delivery_method = :smtp\n  \
                                      config.action_mailer.smtp_settings = SMTP_SETTINGS",
                        },
                    ),
                ],
            )
            .announce("Setting up the production environment"),
        )
        .register(
            Step::actions(
                "setup_staging_environment",
                vec![SubAction::render(
                    "config/environments/staging.rb",
                    "config/environments/staging.rb",
                )],
            )
            .announce("Setting up the staging environment"),
        )
        .register(
            Step::actions(
                "setup_secret_token",
                vec![
                    SubAction::render("config/secrets.yml", "config/secrets.yml"),
                    SubAction::render("env.example", ".env.example"),
                ],
            )
            .announce("Moving secret token out of version control"),
        )
        .register(
            Step::actions(
                "create_views",
                vec![
                    SubAction::render(
                        "views/_flashes.html.erb",
                        "app/views/application/_flashes.html.erb",
                    ),
                    SubAction::render(
                        "views/_javascript.html.erb",
                        "app/views/application/_javascript.html.erb",
                    ),
                    SubAction::render(
                        "views/application.html.erb",
                        "app/views/layouts/application.html.erb",
                    ),
                ],
            )
            .announce("Creating shared views"),
        )
        .register(
            Step::actions(
                "configure_app",
                vec![
                    SubAction::render("config/puma.rb", "config/puma.rb"),
                    SubAction::render("Procfile", "Procfile"),
                    SubAction::render(
                        "config/initializers/active_job.rb",
                        "config/initializers/active_job.rb",
                    ),
                ],
            )
            .announce("Configuring app"),
        )
        .register(
            Step::actions(
                "setup_stylesheets",
                vec![SubAction::render(
                    "stylesheets/application.scss",
                    "app/assets/stylesheets/application.scss",
                )],
            )
            .announce("Set up stylesheets"),
        )
        .register(
            Step::group(
                "setup_javascripts",
                vec![
                    Step::actions(
                        "copy_javascripts",
                        vec![SubAction::render(
                            "javascripts/application.js",
                            "app/assets/javascripts/application.js",
                        )],
                    ),
                    Step::actions(
                        "add_webpack_pack",
                        vec![
                            SubAction::render(
                                "javascript/packs/application.js",
                                "app/javascript/packs/application.js",
                            ),
                            SubAction::edit(
                                "app/views/application/_javascript.html.erb",
                                TextEdit::InsertAfter {
                                    anchor: "<%= javascript_include_tag :application %>\n",
                                    text: "<%= javascript_pack_tag \"application\" %>\n",
                                },
                            ),
                        ],
                    )
                    .when("webpack", webpack_enabled),
                ],
            )
            .announce("Set up javascript"),
        )
        .register(
            Step::actions(
                "copy_miscellaneous_files",
                vec![
                    SubAction::render("editorconfig", ".editorconfig"),
                    SubAction::render(
                        "config/initializers/json_encoding.rb",
                        "config/initializers/json_encoding.rb",
                    ),
                ],
            )
            .announce("Copying miscellaneous support files"),
        )
        .register(
            Step::actions(
                "customize_error_pages",
                vec![
                    SubAction::render("public/404.html", "public/404.html"),
                    SubAction::render("public/422.html", "public/422.html"),
                    SubAction::render("public/500.html", "public/500.html"),
                ],
            )
            .announce("Customizing the 500/404/422 pages"),
        )
        .register(Step::actions(
            "remove_routes_comment_lines",
            vec![SubAction::edit(
                "config/routes.rb",
                TextEdit::DropIndentedLines { prefix: "#" },
            )],
        ))
        .register(
            Step::group(
                "setup_git",
                vec![
                    Step::actions(
                        "setup_gitignore",
                        vec![SubAction::render("gitignore", ".gitignore")],
                    ),
                    Step::actions(
                        "init_git",
                        vec![SubAction::command(CommandSpec::new("git").args(&["init"]))],
                    ),
                ],
            )
            .announce("Initializing git")
            .when("!skip_vcs", vcs_enabled),
        )
        .register(
            Step::group(
                "setup_database",
                vec![
                    Step::branch(
                        "use_database_config_template",
                        Branch::new("database", database_selection).arm(
                            "postgresql",
                            vec![SubAction::render(
                                "config/postgresql.yml",
                                "config/database.yml",
                            )],
                        ),
                    ),
                    Step::actions(
                        "create_database",
                        vec![SubAction::command(
                            CommandSpec::new("bin/rails").args(&["db:create"]),
                        )],
                    ),
                ],
            )
            .announce("Setting up database"),
        )
        .register(
            Step::actions(
                "create_deploy_apps",
                vec![
                    SubAction::command(
                        CommandSpec::new("heroku")
                            .args(&["create"])
                            .template("{{STAGING_APP}}")
                            .args(&["--remote", "staging"])
                            .words("{{DEPLOY_FLAGS}}"),
                    ),
                    SubAction::command(
                        CommandSpec::new("heroku")
                            .args(&["create"])
                            .template("{{PRODUCTION_APP}}")
                            .args(&["--remote", "production"])
                            .words("{{DEPLOY_FLAGS}}"),
                    ),
                    SubAction::command(CommandSpec::new("heroku").args(&[
                        "config:add",
                        "RAILS_SERVE_STATIC_FILES=true",
                        "--remote",
                        "staging",
                    ])),
                    SubAction::command(CommandSpec::new("heroku").args(&[
                        "config:add",
                        "RAILS_SERVE_STATIC_FILES=true",
                        "--remote",
                        "production",
                    ])),
                    SubAction::command(
                        CommandSpec::new("heroku")
                            .args(&["config:add"])
                            .template("SECRET_KEY_BASE={{STAGING_SECRET_KEY_BASE}}")
                            .args(&["--remote", "staging"]),
                    ),
                    SubAction::command(
                        CommandSpec::new("heroku")
                            .args(&["config:add"])
                            .template("SECRET_KEY_BASE={{PRODUCTION_SECRET_KEY_BASE}}")
                            .args(&["--remote", "production"]),
                    ),
                ],
            )
            .announce("Creating deployment apps")
            .when("!skip_deploy_provisioning", deploy_enabled),
        )
        .register(
            Step::actions(
                "create_code_host_repo",
                vec![SubAction::command(
                    CommandSpec::new("hub")
                        .args(&["create"])
                        .template("{{CODE_HOST_REPO}}"),
                )],
            )
            .announce("Creating code host repository")
            .when("!skip_vcs && code_host_repo", code_host_requested),
        )
        .register(
            Step::actions(
                "setup_segment",
                vec![SubAction::render(
                    "views/_analytics.html.erb",
                    "app/views/application/_analytics.html.erb",
                )],
            )
            .announce("Setting up Segment"),
        )
        .register(
            Step::actions(
                "setup_bundler_audit",
                vec![SubAction::render(
                    "lib/tasks/bundler_audit.rake",
                    "lib/tasks/bundler_audit.rake",
                )],
            )
            .announce("Setting up bundler-audit"),
        )
        .register(
            Step::actions(
                "setup_spring",
                vec![SubAction::command(
                    CommandSpec::new("bundle").args(&["exec", "spring", "binstub", "--all"]),
                )],
            )
            .announce("Springifying binstubs"),
        )
        .register(
            Step::actions(
                "initial_commit",
                vec![
                    SubAction::command(CommandSpec::new("git").args(&["add", "."])),
                    SubAction::command(
                        CommandSpec::new("git").args(&["commit", "-m", "Initial commit"]),
                    ),
                    SubAction::command(CommandSpec::new("git").args(&["branch", "production"])),
                    SubAction::command(CommandSpec::new("git").args(&["branch", "staging"])),
                ],
            )
            .announce("Creating initial commit and branches")
            .when("!skip_vcs", vcs_enabled),
        )
        .register(
            Step::actions(
                "push_to_origin",
                vec![
                    SubAction::command(
                        CommandSpec::new("git")
                            .args(&["remote", "add", "origin"])
                            .template("{{GIT_REMOTE_ORIGIN}}"),
                    ),
                    SubAction::command(
                        CommandSpec::new("git").args(&["push", "-u", "origin", "HEAD"]),
                    ),
                ],
            )
            .announce("Pushing to origin remote")
            .when("!skip_vcs && git_remote_origin", origin_requested),
        )
        .register(
            Step::branch(
                "setup_css_framework",
                Branch::new("css_framework", css_selection)
                    .arm(
                        "bourbon_n_friends",
                        vec![
                            SubAction::command(CommandSpec::new("bundle").args(&["add", "bourbon"])),
                            SubAction::command(CommandSpec::new("bundle").args(&["add", "neat"])),
                            SubAction::render(
                                "stylesheets/bourbon_n_friends.scss",
                                "app/assets/stylesheets/application.scss",
                            ),
                        ],
                    )
                    .arm(
                        "bootstrap",
                        vec![
                            SubAction::command(
                                CommandSpec::new("bundle").args(&["add", "bootstrap"]),
                            ),
                            SubAction::render(
                                "stylesheets/bootstrap.scss",
                                "app/assets/stylesheets/application.scss",
                            ),
                        ],
                    )
                    .arm(
                        "foundation",
                        vec![
                            SubAction::command(
                                CommandSpec::new("bundle").args(&["add", "foundation-rails"]),
                            ),
                            SubAction::render(
                                "stylesheets/foundation.scss",
                                "app/assets/stylesheets/application.scss",
                            ),
                        ],
                    ),
            )
            .announce("Installing the css framework"),
        )
        .register(Step::actions("outro", vec![]).announce(
            "Congratulations! Remember to update the README with specifics for your project.",
        ))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{configuration::ScaffoldOptions, step::StepBody};

    fn names(pipeline: &Pipeline) -> Vec<&'static str> {
        pipeline.steps().iter().map(Step::name).collect()
    }

    #[test]
    fn builds_in_documented_order() {
        let pipeline = scaffold_pipeline().unwrap();
        assert_eq!(
            names(&pipeline),
            vec![
                "copy_project_markdown_files",
                "customize_gemfile",
                "setup_development_environment",
                "setup_test_environment",
                "setup_production_environment",
                "setup_staging_environment",
                "setup_secret_token",
                "create_views",
                "configure_app",
                "setup_stylesheets",
                "setup_javascripts",
                "copy_miscellaneous_files",
                "customize_error_pages",
                "remove_routes_comment_lines",
                "setup_git",
                "setup_database",
                "create_deploy_apps",
                "create_code_host_repo",
                "setup_segment",
                "setup_bundler_audit",
                "setup_spring",
                "initial_commit",
                "push_to_origin",
                "setup_css_framework",
                "outro",
            ]
        );
    }

    #[test]
    fn skip_vcs_gates_every_git_step() {
        let mut options = ScaffoldOptions::new("shop");
        options.skip_vcs = true;
        options.code_host_repo = Some("acme/shop".into());
        options.git_remote_origin = Some("git@example.com:acme/shop.git".into());
        let config = Configuration::from_options(options).unwrap();

        let plan = scaffold_pipeline().unwrap().plan(&config);
        for name in [
            "setup_git",
            "setup_gitignore",
            "init_git",
            "create_code_host_repo",
            "initial_commit",
            "push_to_origin",
        ] {
            let row = plan.iter().find(|p| p.name == name).unwrap();
            assert!(!row.runs, "{name} should be skipped");
        }
    }

    #[test]
    fn webpack_and_deploy_gate_gemfile_members() {
        let runs = |f: fn(&mut ScaffoldOptions)| {
            let mut options = ScaffoldOptions::new("shop");
            f(&mut options);
            let config = Configuration::from_options(options).unwrap();
            scaffold_pipeline()
                .unwrap()
                .plan(&config)
                .into_iter()
                .filter(|p| p.runs)
                .map(|p| p.name)
                .collect::<Vec<_>>()
        };

        let defaults = runs(|_| {});
        assert!(defaults.contains(&"add_deploy_gems"));
        assert!(!defaults.contains(&"add_webpacker"));
        assert!(!defaults.contains(&"install_webpacker"));

        let webpack = runs(|o| {
            o.webpack = true;
            o.skip_deploy_provisioning = true;
        });
        for name in ["add_webpacker", "install_webpacker", "add_webpack_pack"] {
            assert!(webpack.contains(&name), "{name} should run");
        }
        assert!(!webpack.contains(&"add_deploy_gems"));
    }

    #[test]
    fn css_branch_has_one_arm_per_framework() {
        let pipeline = scaffold_pipeline().unwrap();
        let step = pipeline
            .steps()
            .iter()
            .find(|s| s.name() == "setup_css_framework")
            .unwrap();
        let StepBody::Branch(branch) = step.body() else {
            panic!("setup_css_framework is not a branch");
        };
        let arms: Vec<_> = branch.arms().iter().map(|a| a.value).collect();
        assert_eq!(arms, vec!["bourbon_n_friends", "bootstrap", "foundation"]);
    }
}
