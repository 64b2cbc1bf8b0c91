use std::path::Path;

use scribe::build::{HOME_TEMPLATE, POST_TEMPLATE, TAG_TEMPLATE};
use scribe::config::{Config, DEFAULT_CONFIG_FILE};
use scribe::render::RenderOptions;

use crate::InitArgs;

const BASE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{% block title %}{{ site.title }}{% endblock %}</title>
  <link rel="stylesheet" href="/highlight.css">
</head>
<body>
  <header><a href="/">{{ site.title }}</a></header>
  <main>{% block main %}{% endblock %}</main>
</body>
</html>
"#;

const POST_HTML: &str = r#"{% extends "base.html" %}
{% block title %}{{ post.title }} | {{ site.title }}{% endblock %}
{% block main %}
<article>
  <h1>{{ post.title }}</h1>
  {% if post.date %}<time>{{ post.date }}</time>{% endif %}
  {{ post.content | safe }}
  <ul class="tags">
  {% for tag in post.tags %}<li><a href="{{ tag.url }}">{{ tag.name }}</a></li>{% endfor %}
  </ul>
</article>
{% endblock %}
"#;

const TAG_HTML: &str = r#"{% extends "base.html" %}
{% block title %}{{ tag.name }} | {{ site.title }}{% endblock %}
{% block main %}
<h1>Posts tagged "{{ tag.name }}"</h1>
<ul>
{% for post in tag.posts %}<li><a href="{{ post.url }}">{{ post.title }}</a></li>{% endfor %}
</ul>
{% endblock %}
"#;

const HOME_HTML: &str = r#"{% extends "base.html" %}
{% block main %}
{% for post in posts %}
<section>
  <h2><a href="{{ post.url }}">{{ post.title }}</a></h2>
  {{ post.summary | safe }}
</section>
{% endfor %}
<nav class="tags">
{% for tag in tags %}<a href="{{ tag.url }}">{{ tag.name }} ({{ tag.count }})</a> {% endfor %}
</nav>
{% endblock %}
"#;

const HELLO_POST: &str = r#"---
title: Hello World
tags: [welcome]
---
Your first post :wave:

<!-- more -->

## Table of Contents

## Next steps

Edit `content/hello-world.md`, then run `scribe build`.
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    let config_file = path.join(DEFAULT_CONFIG_FILE);
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "Already initialized: {config_file} exists",
            config_file = config_file.display()
        ));
    }

    println!("Initializing blog in {}", path.display());

    let config = Config {
        render: RenderOptions::new()
            .gfm(true)
            .toc(true)
            .emoji(true)
            .slug(true)
            .highlight(true),
        ..Config::default()
    };
    tokio::fs::write(&config_file, config.to_yaml()?).await?;
    println!(
        "Created config file {config_file}",
        config_file = config_file.display()
    );

    let templates_dir = path.join(&config.paths.templates);
    tokio::fs::create_dir_all(&templates_dir).await?;
    for (name, source) in [
        ("base", BASE_HTML),
        (POST_TEMPLATE, POST_HTML),
        (TAG_TEMPLATE, TAG_HTML),
        (HOME_TEMPLATE, HOME_HTML),
    ] {
        write_new(&templates_dir.join(format!("{}.html", name)), source).await?;
    }

    let content_dir = path.join(&config.paths.content);
    tokio::fs::create_dir_all(path.join(&config.paths.media)).await?;
    write_new(&content_dir.join("hello-world.md"), HELLO_POST).await?;

    Ok(())
}

/// Write a starter file unless one already exists.
async fn write_new(path: &Path, contents: &str) -> Result<(), anyhow::Error> {
    if tokio::fs::try_exists(path).await? {
        println!("Kept existing {}", path.display());
        return Ok(());
    }
    tokio::fs::write(path, contents).await?;
    println!("Created {}", path.display());
    Ok(())
}
