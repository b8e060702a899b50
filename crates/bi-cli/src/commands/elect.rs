use bi_core::{SessionUser, UserId};
use bi_sync::{elect_writer, is_authoritative};

fn parse_user(arg: &str) -> Result<SessionUser, String> {
    let mut parts = arg.split(':');
    let id = parts.next().filter(|s| !s.is_empty());
    let role = parts.next();
    let state = parts.next();
    let (Some(id), Some(role)) = (id, role) else {
        return Err(format!("bad user '{arg}', expected ID:gm or ID:player"));
    };
    let user = match role {
        "gm" => SessionUser::gm(id),
        "player" => SessionUser::player(id),
        other => return Err(format!("bad role '{other}' in '{arg}'")),
    };
    match state {
        None | Some("active") => Ok(user),
        Some("inactive") => Ok(user.inactive()),
        Some(other) => Err(format!("bad state '{other}' in '{arg}'")),
    }
}

pub fn run(specs: &[String], local: Option<&str>) -> Result<(), String> {
    let users = specs
        .iter()
        .map(|s| parse_user(s))
        .collect::<Result<Vec<_>, _>>()?;

    match elect_writer(&users) {
        Some(writer) => println!("  Writer: {writer}"),
        None => println!("  No active game master; nobody may write."),
    }

    if let Some(local) = local {
        let local = UserId::new(local);
        let verdict = if is_authoritative(&local, &users) {
            "is"
        } else {
            "is not"
        };
        println!("  {local} {verdict} the writer");
    }
    Ok(())
}
