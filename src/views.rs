use maud::{DOCTYPE, Markup, html};

use crate::models::{PostDetail, PostSummary, UserProfile};

/// document
///
/// Shared page shell: head, nav, and the page body. The nav varies on
/// login state only; it never needs more than the session flag.
pub fn document(markup: Markup, title: &str, logged_in: bool) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - blog portal" }
            }

            body {
                (header(logged_in))
                main { (markup) }
            }
        }
    }
}

fn header(logged_in: bool) -> Markup {
    html! {
        nav {
            a href="/" { "blog portal" }
            @if logged_in {
                span {
                    a href="/profile" { "Profile" }
                    " - "
                    a href="/logout" { "Log out" }
                }
            } @else {
                span {
                    a href="/login" { "Log in" }
                }
            }
        }
    }
}

/// Homepage: one entry per post, author's name only.
pub fn homepage(posts: &[PostSummary], logged_in: bool) -> Markup {
    let markup = html! {
        h1 { "Latest posts" }
        ul .post-list {
            @for post in posts {
                li {
                    a href={ "/post/" (post.id) } { (post.title) }
                    " by " span .author { (post.author_name) }
                    " on " (post.created_at.format("%Y-%m-%d"))
                }
            }
        }
    };

    document(markup, "home", logged_in)
}

/// Single post with its comments. `same_user` unlocks the edit link for
/// the post owner.
pub fn post(detail: &PostDetail, logged_in: bool, same_user: bool) -> Markup {
    let markup = html! {
        article {
            h1 { (detail.title) }
            p .byline {
                "by " (detail.author_name) " on " (detail.created_at.format("%Y-%m-%d"))
            }
            p { (detail.content) }

            @if same_user {
                p { a href={ "/edit/" (detail.id) } { "Edit this post" } }
            }
        }

        section .comments {
            h2 { "Comments" }
            @if detail.comments.is_empty() {
                p { "No comments yet." }
            } @else {
                ul {
                    @for comment in &detail.comments {
                        li {
                            blockquote { (comment.text) }
                            span .author { (comment.author_name) }
                        }
                    }
                }
            }

            @if logged_in {
                p { a href={ "/comment/" (detail.id) } { "Add a comment" } }
            }
        }
    };

    document(markup, &detail.title, logged_in)
}

/// Profile page: the user's own posts. Always rendered logged in since
/// the route is gated.
pub fn profile(user: &UserProfile) -> Markup {
    let markup = html! {
        h1 { "Welcome, " (user.name) }

        h2 { "Your posts" }
        @if user.posts.is_empty() {
            p { "You haven't written anything yet." }
        } @else {
            ul .post-list {
                @for post in &user.posts {
                    li {
                        a href={ "/post/" (post.id) } { (post.title) }
                        " on " (post.created_at.format("%Y-%m-%d"))
                    }
                }
            }
        }
    };

    document(markup, "profile", true)
}

/// Login form. Only reachable while logged out; the handler redirects
/// authenticated sessions before rendering.
pub fn login() -> Markup {
    let markup = html! {
        h1 { "Log in" }
        form method="post" action="/login" {
            label for="name" { "Name" }
            input type="text" name="name" required;

            label for="password" { "Password" }
            input type="password" name="password" required;

            input type="submit" value="Log in";
        }
    };

    document(markup, "log in", false)
}

/// Comment-composition page over the full post shape.
pub fn comment(detail: &PostDetail, user_id: i32) -> Markup {
    let markup = html! {
        h1 { "Comment on \"" (detail.title) "\"" }
        p .byline { "by " (detail.author_name) }

        form method="post" action={ "/comment/" (detail.id) } {
            input type="hidden" name="user_id" value=(user_id);
            label for="text" { "Your comment" }
            textarea name="text" required {}
            input type="submit" value="Post comment";
        }

        section .comments {
            h2 { "Existing comments" }
            ul {
                @for comment in &detail.comments {
                    li {
                        blockquote { (comment.text) }
                        span .author { (comment.author_name) }
                    }
                }
            }
        }
    };

    document(markup, "comment", true)
}

/// Post-edit page, pre-filled with the current content.
pub fn edit(detail: &PostDetail, user_id: i32) -> Markup {
    let markup = html! {
        h1 { "Edit \"" (detail.title) "\"" }

        form method="post" action={ "/edit/" (detail.id) } {
            input type="hidden" name="user_id" value=(user_id);

            label for="title" { "Title" }
            input type="text" name="title" value=(detail.title) required;

            label for="content" { "Content" }
            textarea name="content" required { (detail.content) }

            input type="submit" value="Save changes";
        }
    };

    document(markup, "edit", true)
}
