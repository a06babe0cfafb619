use comrak::options::Options;

pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();
    configure_extensions(&mut options);
    options
}

fn configure_extensions(options: &mut Options<'static>) {
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.tagfilter = false;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;

    let render = &mut options.render;
    render.hardbreaks = true;
    render.github_pre_lang = true;
    render.r#unsafe = true;
    // Marks markdown-built elements apart from raw HTML; stripped in post-processing.
    render.sourcepos = true;
}
